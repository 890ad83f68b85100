//! Bookstore Core - Shared types library.
//!
//! This crate provides the domain types used across the bookstore components:
//! - `server` - HTTP API, authentication and order services
//! - `cli` - Command-line tools for migrations and key generation
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. Database encoding is available behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
