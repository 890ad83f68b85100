//! Registration handler.

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::services::AuthService;
use crate::state::AppState;

/// Registration request body.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Registration response body.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: String,
}

/// Register a new credential.
///
/// Responds 201 with the registered email, 400 for a malformed email or empty
/// password, and 409 if the email is taken.
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let Json(request) = payload?;

    AuthService::new(state.pool(), state.tokens())
        .register(&request.email, &request.password)
        .await?;

    tracing::info!(email = %request.email, "Registered credential");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: request.email,
        }),
    ))
}
