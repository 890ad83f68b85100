//! Catalog book.

use serde::Serialize;

use bookstore_core::BookId;

/// A book in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
}
