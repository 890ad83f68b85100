//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server errors are captured to
//! Sentry before responding, and clients only ever see a generic message for
//! them.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::ServiceError;

/// Application-level error type for the HTTP API.
#[derive(Debug, Error)]
pub enum AppError {
    /// A service operation failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The request could not be decoded.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Service(ServiceError::Invalid(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Service(ServiceError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Service(ServiceError::Unauthorized) => StatusCode::UNAUTHORIZED,
            Self::Service(ServiceError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if let Self::Service(ServiceError::Internal(source)) = &self {
            let event_id = sentry::capture_error(source.as_ref());
            tracing::error!(
                error = %source,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Service(ServiceError::Internal(_)) => "internal server error".to_string(),
            Self::Service(ServiceError::Unauthorized) => "unauthorized".to_string(),
            Self::Service(ServiceError::Invalid(msg) | ServiceError::Conflict(msg))
            | Self::BadRequest(msg) => msg.clone(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the authenticated subject.
pub fn set_sentry_user(email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;
    use crate::db::RepositoryError;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_status_codes() {
        let cases = [
            (
                AppError::from(ServiceError::invalid("bad email")),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(ServiceError::Conflict("taken".to_string())),
                StatusCode::CONFLICT,
            ),
            (
                AppError::from(ServiceError::Unauthorized),
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::from(ServiceError::from(RepositoryError::Database(
                    sqlx::Error::PoolTimedOut,
                ))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::BadRequest("not json".to_string()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, expected) in cases {
            let (status, _) = render(err).await;
            assert_eq!(status, expected);
        }
    }

    #[tokio::test]
    async fn test_client_messages() {
        let (_, body) = render(AppError::from(ServiceError::invalid("bad email"))).await;
        assert_eq!(body, json!({ "error": "bad email" }));

        let (_, body) = render(AppError::from(ServiceError::Unauthorized)).await;
        assert_eq!(body, json!({ "error": "unauthorized" }));
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let err = AppError::from(ServiceError::from(RepositoryError::Database(
            sqlx::Error::Protocol("relation bookstore.logins does not exist".to_string()),
        )));
        let (_, body) = render(err).await;

        assert_eq!(body, json!({ "error": "internal server error" }));
        assert!(!body.to_string().contains("bookstore.logins"));
    }
}
