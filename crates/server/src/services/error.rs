//! Service error taxonomy.
//!
//! Every public service operation returns one of four mutually exclusive
//! outcomes. Storage errors are reclassified at the service boundary so that
//! callers never see SQL details.

use thiserror::Error;

use crate::db::RepositoryError;

/// Boxed error source for [`ServiceError::Internal`].
pub type InternalSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by the auth, order and book services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or missing input. Detected before any storage access.
    #[error("invalid input: {0}")]
    Invalid(String),

    /// A uniqueness constraint rejected a write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Credential mismatch or token rejection. Carries no detail.
    #[error("unauthorized")]
    Unauthorized,

    /// Storage, transaction or signing failure not caused by the caller.
    #[error("internal error")]
    Internal(#[source] InternalSource),
}

impl ServiceError {
    /// Create an `Invalid` error from any message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    /// Wrap any error as `Internal`.
    pub fn internal(source: impl Into<InternalSource>) -> Self {
        Self::Internal(source.into())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(message) => Self::Conflict(message),
            other => Self::internal(other),
        }
    }
}

impl From<bookstore_core::EmailError> for ServiceError {
    fn from(err: bookstore_core::EmailError) -> Self {
        Self::Invalid(format!("invalid email: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_conflict_stays_conflict() {
        let err = ServiceError::from(RepositoryError::Conflict("email taken".to_owned()));
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == "email taken"));
    }

    #[test]
    fn test_other_repository_errors_become_internal() {
        let err = ServiceError::from(RepositoryError::Database(sqlx::Error::RowNotFound));
        assert!(matches!(err, ServiceError::Internal(_)));

        let err = ServiceError::from(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[test]
    fn test_internal_display_hides_source() {
        let err = ServiceError::from(RepositoryError::Database(sqlx::Error::Protocol(
            "SELECT secret FROM table".to_owned(),
        )));
        assert_eq!(err.to_string(), "internal error");
    }

    #[test]
    fn test_email_error_is_invalid() {
        let err = ServiceError::from(bookstore_core::EmailError::MissingAtSymbol);
        assert!(matches!(err, ServiceError::Invalid(_)));
    }
}
