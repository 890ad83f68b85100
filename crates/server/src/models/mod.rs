//! Domain models for the bookstore.
//!
//! These types are what services return and what the HTTP layer serializes.
//! Database row types stay private to the `db` module.

pub mod book;
pub mod login;
pub mod order;

pub use book::Book;
pub use login::Login;
pub use order::{NewOrderItem, Order, OrderDetail, OrderItem};
