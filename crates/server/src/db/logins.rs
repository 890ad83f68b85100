//! Credential repository.
//!
//! Stores one password hash per email. Uniqueness comes from the primary key
//! on `bookstore.logins.email`, so concurrent registrations of the same email
//! resolve in the database and the loser sees [`RepositoryError::Conflict`].

use sqlx::PgPool;
use tracing::instrument;

use bookstore_core::Email;

use super::{RepositoryError, conflict_on_unique_violation};
use crate::models::Login;

/// Repository for credential database operations.
pub struct LoginRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LoginRepository<'a> {
    /// Create a new credential repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new credential.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, login), fields(email = %login.email))]
    pub async fn insert(&self, login: &Login) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO bookstore.logins (email, hash)
            VALUES ($1, $2)
            ",
        )
        .bind(&login.email)
        .bind(&login.hash)
        .execute(self.pool)
        .await
        .map_err(|e| conflict_on_unique_violation(e, "email already registered"))?;

        Ok(())
    }

    /// Get the credential for an email.
    ///
    /// Returns `None` if no credential exists for the email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Login>, RepositoryError> {
        let row: Option<(Email, String)> = sqlx::query_as(
            r"
            SELECT email, hash
            FROM bookstore.logins
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(email, hash)| Login { email, hash }))
    }

    /// Delete the credential for an email.
    ///
    /// Credentials are never removed by the API; this exists for test cleanup
    /// and operator tooling.
    ///
    /// # Returns
    ///
    /// Returns `true` if a credential was deleted, `false` if none existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn delete(&self, email: &Email) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM bookstore.logins
            WHERE email = $1
            ",
        )
        .bind(email)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
