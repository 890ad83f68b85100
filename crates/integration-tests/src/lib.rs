//! Integration tests for the bookstore server.
//!
//! # Running Tests
//!
//! ```bash
//! export BOOKSTORE_TEST_DATABASE_URL=postgres://localhost/bookstore_test
//! cargo test -p bookstore-integration-tests -- --ignored
//! ```
//!
//! Every test registers its own uniquely-named emails and deletes their rows
//! on cleanup, so tests can share one database and run in parallel.

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use secrecy::SecretString;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use bookstore_core::Email;
use bookstore_server::config::ServerConfig;
use bookstore_server::db::MIGRATOR;
use bookstore_server::db::logins::LoginRepository;
use bookstore_server::routes;
use bookstore_server::services::auth::{SEED_LEN, SigningKeys, TokenIssuer};
use bookstore_server::state::AppState;

/// Environment variable naming the test database.
pub const TEST_DATABASE_URL: &str = "BOOKSTORE_TEST_DATABASE_URL";

/// Fixed signing seed used by every test context.
pub const TEST_SEED: [u8; SEED_LEN] = [0x5a; SEED_LEN];

/// A migrated database plus an application state built on it.
pub struct TestContext {
    pub pool: PgPool,
    pub state: AppState,
    cleanup: Vec<Email>,
}

impl TestContext {
    /// Connect to the test database and run migrations.
    ///
    /// # Panics
    ///
    /// Panics if `BOOKSTORE_TEST_DATABASE_URL` is unset or the database is
    /// unreachable.
    pub async fn new() -> Self {
        let url = std::env::var(TEST_DATABASE_URL)
            .unwrap_or_else(|_| panic!("{TEST_DATABASE_URL} must be set for integration tests"));

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .expect("Failed to connect to test database");
        MIGRATOR
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let config = ServerConfig {
            database_url: SecretString::from(url),
            host: "127.0.0.1".parse().expect("valid address"),
            port: 0,
            base_path: String::new(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
        };
        let keys = SigningKeys::from_seed(&TEST_SEED).expect("valid seed");
        let state = AppState::new(config, pool.clone(), keys);

        Self {
            pool,
            state,
            cleanup: Vec::new(),
        }
    }

    /// A fresh email that no other test uses. Its rows are removed by
    /// [`TestContext::cleanup`].
    pub fn unique_email(&mut self, prefix: &str) -> Email {
        let email = Email::parse(&format!("{prefix}-{}@domain.example", Uuid::new_v4().simple()))
            .expect("generated email is valid");
        self.cleanup.push(email.clone());
        email
    }

    /// The session token issuer of this context's state.
    #[must_use]
    pub fn tokens(&self) -> &TokenIssuer {
        self.state.tokens()
    }

    /// The application router over this context's state.
    #[must_use]
    pub fn router(&self) -> Router {
        routes::router(self.state.clone())
    }

    /// Send a request through the router and decode the JSON response body.
    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self
            .router()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is JSON")
        };
        (status, body)
    }

    /// Count order headers owned by `email`.
    pub async fn order_count(&self, email: &Email) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM bookstore.orders WHERE user_email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count orders")
    }

    /// Count order items owned by `email`.
    pub async fn item_count(&self, email: &Email) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM bookstore.order_items WHERE user_email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count order items")
    }

    /// Delete every row created for this context's emails.
    pub async fn cleanup(self) {
        for email in &self.cleanup {
            sqlx::query("DELETE FROM bookstore.orders WHERE user_email = $1")
                .bind(email)
                .execute(&self.pool)
                .await
                .expect("Failed to delete orders");
            LoginRepository::new(&self.pool)
                .delete(email)
                .await
                .expect("Failed to delete login");
        }
    }
}
