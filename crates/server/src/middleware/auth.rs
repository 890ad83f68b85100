//! Bearer token authentication extractor.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::Span;

use bookstore_core::Email;

use crate::error::{AppError, set_sentry_user};
use crate::services::ServiceError;
use crate::state::AppState;

/// Extractor that requires a valid session token.
///
/// Reads `Authorization: Bearer <token>` and verifies it with the state's
/// token issuer. Yields the token's subject. Any missing, malformed, expired
/// or forged token is rejected with 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     AuthenticatedUser(email): AuthenticatedUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {email}!")
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Email);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ServiceError::Unauthorized)?;
        let claims = state.tokens().verify(token)?;

        Span::current().record("user", claims.subject.as_str());
        set_sentry_user(claims.subject.as_str());

        Ok(Self(claims.subject))
    }
}

/// Extract the token from an `Authorization: Bearer` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
