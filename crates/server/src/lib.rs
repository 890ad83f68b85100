//! Bookstore API server library.
//!
//! Password credentials with Ed25519-signed session tokens, a read-only book
//! catalog, and transactional orders. Exposed as a library so the binary, the
//! CLI and the integration tests share one implementation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
