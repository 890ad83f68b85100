//! Registration and login against a real database.
//!
//! Requires `BOOKSTORE_TEST_DATABASE_URL`. Run with:
//! `cargo test -p bookstore-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use std::time::Instant;

use axum::body::Body;
use axum::http::{
    Request, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::json;

use bookstore_integration_tests::TestContext;
use bookstore_server::db::logins::LoginRepository;
use bookstore_server::services::{AuthService, ServiceError};

fn register_request(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/users")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": email, "password": password }).to_string(),
        ))
        .unwrap()
}

fn login_request(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/login")
        .header(
            AUTHORIZATION,
            format!("Basic {}", STANDARD.encode(format!("{email}:{password}"))),
        )
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
#[ignore = "Requires BOOKSTORE_TEST_DATABASE_URL"]
async fn test_register_then_login() {
    let mut ctx = TestContext::new().await;
    let email = ctx.unique_email("budi");
    let auth = AuthService::new(&ctx.pool, ctx.tokens());

    auth.register(email.as_str(), "password1").await.unwrap();

    let stored = LoginRepository::new(&ctx.pool)
        .get_by_email(&email)
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.hash, "password1");
    assert!(stored.hash.contains('.'));

    let token = auth.login(email.as_str(), "password1").await.unwrap();
    let claims = ctx.tokens().verify(&token).unwrap();
    assert_eq!(claims.subject, email);
    assert_eq!(claims.issuer, "gotu");

    ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires BOOKSTORE_TEST_DATABASE_URL"]
async fn test_register_twice_is_conflict() {
    let mut ctx = TestContext::new().await;
    let email = ctx.unique_email("budi");
    let auth = AuthService::new(&ctx.pool, ctx.tokens());

    auth.register(email.as_str(), "password1").await.unwrap();
    let err = auth
        .register(email.as_str(), "another-password")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    // The first credential still works
    auth.login(email.as_str(), "password1").await.unwrap();

    ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires BOOKSTORE_TEST_DATABASE_URL"]
async fn test_concurrent_registration_has_one_winner() {
    let mut ctx = TestContext::new().await;
    let email = ctx.unique_email("race");
    let auth = AuthService::new(&ctx.pool, ctx.tokens());

    let (a, b) = tokio::join!(
        auth.register(email.as_str(), "password1"),
        auth.register(email.as_str(), "password2"),
    );

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(ServiceError::Conflict(_))))
    );

    ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires BOOKSTORE_TEST_DATABASE_URL"]
async fn test_invalid_registration_writes_nothing() {
    let mut ctx = TestContext::new().await;
    let email = ctx.unique_email("cahyo");
    let auth = AuthService::new(&ctx.pool, ctx.tokens());

    let err = auth.register(email.as_str(), "").await.unwrap_err();
    assert!(matches!(err, ServiceError::Invalid(_)));

    let stored = LoginRepository::new(&ctx.pool)
        .get_by_email(&email)
        .await
        .unwrap();
    assert!(stored.is_none());

    ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires BOOKSTORE_TEST_DATABASE_URL"]
async fn test_login_failures_are_indistinguishable() {
    let mut ctx = TestContext::new().await;
    let email = ctx.unique_email("budi");
    let unknown = ctx.unique_email("nobody");
    let auth = AuthService::new(&ctx.pool, ctx.tokens());

    auth.register(email.as_str(), "password1").await.unwrap();

    let wrong_password = auth.login(email.as_str(), "password2").await.unwrap_err();
    let unknown_email = auth.login(unknown.as_str(), "password1").await.unwrap_err();

    assert!(matches!(wrong_password, ServiceError::Unauthorized));
    assert!(matches!(unknown_email, ServiceError::Unauthorized));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());

    ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires BOOKSTORE_TEST_DATABASE_URL"]
async fn test_unknown_email_costs_a_password_check() {
    let mut ctx = TestContext::new().await;
    let email = ctx.unique_email("timing");
    let unknown = ctx.unique_email("nobody");
    let auth = AuthService::new(&ctx.pool, ctx.tokens());

    auth.register(email.as_str(), "password1").await.unwrap();

    let start = Instant::now();
    auth.login(email.as_str(), "password2").await.unwrap_err();
    let mismatch = start.elapsed();

    let start = Instant::now();
    auth.login(unknown.as_str(), "password2").await.unwrap_err();
    let miss = start.elapsed();

    // A bare lookup is orders of magnitude faster than one Argon2 derivation.
    assert!(miss * 4 >= mismatch, "miss {miss:?}, mismatch {mismatch:?}");

    ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires BOOKSTORE_TEST_DATABASE_URL"]
async fn test_http_register_and_login() {
    let mut ctx = TestContext::new().await;
    let email = ctx.unique_email("http");

    let (status, body) = ctx
        .send_json(register_request(email.as_str(), "password1"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "user": email.as_str() }));

    let (status, _) = ctx
        .send_json(register_request(email.as_str(), "password1"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = ctx
        .send_json(login_request(email.as_str(), "password1"))
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);

    let (status, body) = ctx
        .send_json(login_request(email.as_str(), "wrong"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "unauthorized" }));

    ctx.cleanup().await;
}
