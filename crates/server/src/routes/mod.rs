//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! # API (under /v1{base_path})
//! GET  /health                 - Liveness check
//! POST /users                  - Register (JSON email + password)
//! POST /login                  - Login (HTTP Basic), returns a session token
//! GET  /books                  - Book catalog (requires auth)
//! GET  /orders                 - Caller's orders with items (requires auth)
//! POST /orders                 - Place an order (requires auth)
//! ```

pub mod books;
pub mod health;
pub mod login;
pub mod orders;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the versioned API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/users", post(users::register))
        .route("/login", post(login::login))
        .route("/books", get(books::list))
        .route("/orders", get(orders::list).post(orders::create))
}

/// Create the full application router with state applied.
///
/// The API is nested under the configured route prefix; the health checks
/// are also mounted at the root for load balancers.
pub fn router(state: AppState) -> Router {
    let prefix = state.config().route_prefix();

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest(&prefix, api_routes())
        .with_state(state)
}
