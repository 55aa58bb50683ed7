#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use spinvault_api::auth::token::TokenConfig;
use spinvault_api::config::ServerConfig;
use spinvault_api::router::build_app_router;
use spinvault_api::state::AppState;

pub const ADMIN_KEY: &str = "test-admin-key";
pub const WEBHOOK_TOKEN: &str = "test-webhook-token";
pub const PASSWORD: &str = "correct-horse-battery";

/// Seeded machine: cost 100, version 1 published.
pub const SEED_MACHINE: i64 = 1;
/// Seeded package: 5000 points + 500 bonus.
pub const STARTER_PACKAGE: i64 = 1;
pub const STARTER_POINTS: i64 = 5_500;

/// Build a test `ServerConfig` with fixed secrets and the given spin budget.
pub fn test_config_with_spin_limit(spin_rate_limit: usize) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        token: TokenConfig {
            secret: "test-jwt-secret-that-is-long-enough".to_string(),
            ttl_mins: 60,
        },
        admin_key: ADMIN_KEY.to_string(),
        webhook_token: WEBHOOK_TOKEN.to_string(),
        spin_signing_key: "test-spin-signing-key".to_string(),
        lock_timeout: Duration::from_millis(3_000),
        spin_rate_limit,
        order_rate_limit: 20,
    }
}

pub fn test_config() -> ServerConfig {
    test_config_with_spin_limit(60)
}

/// Build the full application router, using the given database pool.
///
/// Uses the same builder as `main.rs`, so tests exercise the production
/// middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_with_config(pool, test_config())
}

pub fn build_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Credentials attached to a request.
#[derive(Clone, Copy)]
pub enum As<'a> {
    Anonymous,
    User(&'a str),
    Admin,
    Webhook,
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    who: As<'_>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    builder = match who {
        As::Anonymous => builder,
        As::User(token) => builder.header("authorization", format!("Bearer {token}")),
        As::Admin => builder.header("x-admin-key", ADMIN_KEY),
        As::Webhook => builder.header("x-webhook-token", WEBHOOK_TOKEN),
    };
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, who: As<'_>) -> Response<Body> {
    send(app, Method::GET, uri, who, None).await
}

pub async fn post_json(app: &Router, uri: &str, who: As<'_>, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, who, Some(body)).await
}

pub async fn put_json(app: &Router, uri: &str, who: As<'_>, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, who, Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the parsed body.
pub async fn expect_status(response: Response<Body>, status: StatusCode) -> Value {
    let actual = response.status();
    let json = body_json(response).await;
    assert_eq!(actual, status, "unexpected status, body: {json}");
    json
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Sign up and log in. Returns `(user_id, access_token)`.
pub async fn signup_and_login(app: &Router, email: &str) -> (i64, String) {
    let signup = post_json(
        app,
        "/api/v1/auth/signup",
        As::Anonymous,
        json!({ "email": email, "password": PASSWORD, "age_verified": true }),
    )
    .await;
    let user = expect_status(signup, StatusCode::CREATED).await;
    let user_id = user["data"]["id"].as_i64().unwrap();

    let login = post_json(
        app,
        "/api/v1/auth/login",
        As::Anonymous,
        json!({ "email": email, "password": PASSWORD }),
    )
    .await;
    let session = expect_status(login, StatusCode::OK).await;
    (user_id, session["access_token"].as_str().unwrap().to_string())
}

/// Credit points through the admin endpoint.
pub async fn fund(app: &Router, user_id: i64, amount: i64) {
    let response = post_json(
        app,
        &format!("/api/v1/admin/users/{user_id}/adjust-points"),
        As::Admin,
        json!({ "amount": amount, "reason": "test funding" }),
    )
    .await;
    expect_status(response, StatusCode::OK).await;
}

pub async fn spin(app: &Router, token: &str, key: &str) -> Response<Body> {
    post_json(
        app,
        &format!("/api/v1/machines/{SEED_MACHINE}/spin"),
        As::User(token),
        json!({ "idempotency_key": key }),
    )
    .await
}
