//! Book repository.

use sqlx::PgPool;
use tracing::instrument;

use super::RepositoryError;
use crate::models::Book;

/// Repository for the read-only book catalog.
pub struct BookRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BookRepository<'a> {
    /// Create a new book repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every book, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Book>, RepositoryError> {
        let books = sqlx::query_as::<_, Book>(
            r"
            SELECT id, title, author
            FROM bookstore.books
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(books)
    }
}
