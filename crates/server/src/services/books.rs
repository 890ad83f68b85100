//! Book catalog service.

use sqlx::PgPool;
use tracing::instrument;

use super::ServiceError;
use crate::db::books::BookRepository;
use crate::models::Book;

/// Read-only access to the seeded catalog.
pub struct BookService<'a> {
    books: BookRepository<'a>,
}

impl<'a> BookService<'a> {
    /// Create a new book service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            books: BookRepository::new(pool),
        }
    }

    /// List every book, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Internal` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_books(&self) -> Result<Vec<Book>, ServiceError> {
        Ok(self.books.list().await?)
    }
}
