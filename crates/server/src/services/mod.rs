//! Business logic services.
//!
//! Services validate input, call repositories, and reclassify every failure
//! into [`ServiceError`].

pub mod auth;
pub mod books;
mod error;
pub mod orders;

pub use auth::AuthService;
pub use books::BookService;
pub use error::{InternalSource, ServiceError};
pub use orders::OrderService;
