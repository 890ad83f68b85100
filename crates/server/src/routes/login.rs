//! Login handler.
//!
//! Credentials arrive as HTTP Basic auth: `Authorization: Basic
//! base64(email:password)`. The password may itself contain `:`, so only the
//! first colon separates the two.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header::AUTHORIZATION},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Serialize;

use crate::error::Result;
use crate::services::{AuthService, ServiceError};
use crate::state::AppState;

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Exchange Basic credentials for a session token.
///
/// Responds 401 for a missing or malformed header, an unknown email, or a
/// wrong password, without saying which.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LoginResponse>> {
    let (email, password) = basic_credentials(&headers).ok_or(ServiceError::Unauthorized)?;

    let token = AuthService::new(state.pool(), state.tokens())
        .login(&email, &password)
        .await?;

    Ok(Json(LoginResponse { token }))
}

/// Decode `Authorization: Basic` into `(email, password)`.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (email, password) = decoded.split_once(':')?;
    Some((email.to_owned(), password.to_owned()))
}
