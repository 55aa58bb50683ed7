//! Integration tests for signup, login and bearer-token resolution.
//!
//! - Signup provisions a wallet and an empty limits row
//! - Duplicate emails conflict regardless of case
//! - Inactive accounts are rejected even with a valid token

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_provisions_wallet_and_limits(pool: PgPool) {
    let app = build_test_app(pool);
    let (_, token) = signup_and_login(&app, "  New.Player@Example.com ").await;

    let wallet = expect_status(get(&app, "/api/v1/wallet", As::User(&token)).await, StatusCode::OK).await;
    assert_eq!(wallet["data"]["wallet"]["balance_point"], 0);
    assert_eq!(wallet["data"]["recent_transactions"], json!([]));

    let limits = expect_status(
        get(&app, "/api/v1/me/responsible-limit", As::User(&token)).await,
        StatusCode::OK,
    )
    .await;
    assert!(limits["data"]["daily_charge_limit"].is_null());
    assert!(limits["data"]["cooldown_until"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_normalizes_email(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(
        &app,
        "/api/v1/auth/signup",
        As::Anonymous,
        json!({ "email": " Mixed@Case.COM ", "password": PASSWORD }),
    )
    .await;

    let json = expect_status(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["email"], "mixed@case.com");
    assert_eq!(json["data"]["status"], "active");
    assert_eq!(json["data"]["age_verified"], false);
    assert!(json["data"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_conflicts(pool: PgPool) {
    let app = build_test_app(pool);
    signup_and_login(&app, "dup@example.com").await;

    let response = post_json(
        &app,
        "/api/v1/auth/signup",
        As::Anonymous,
        json!({ "email": "DUP@example.com", "password": PASSWORD }),
    )
    .await;

    let json = expect_status(response, StatusCode::CONFLICT).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_rejects_bad_input(pool: PgPool) {
    let app = build_test_app(pool);

    let short = post_json(
        &app,
        "/api/v1/auth/signup",
        As::Anonymous,
        json!({ "email": "short@example.com", "password": "1234567" }),
    )
    .await;
    let json = expect_status(short, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let no_email = post_json(
        &app,
        "/api/v1/auth/signup",
        As::Anonymous,
        json!({ "email": "not-an-email", "password": PASSWORD }),
    )
    .await;
    expect_status(no_email, StatusCode::BAD_REQUEST).await;
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_wrong_password_is_401(pool: PgPool) {
    let app = build_test_app(pool);
    signup_and_login(&app, "login@example.com").await;

    let response = post_json(
        &app,
        "/api/v1/auth/login",
        As::Anonymous,
        json!({ "email": "login@example.com", "password": "wrong-password" }),
    )
    .await;
    let json = expect_status(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(json["code"], "UNAUTHORIZED");

    let unknown = post_json(
        &app,
        "/api/v1/auth/login",
        As::Anonymous,
        json!({ "email": "nobody@example.com", "password": PASSWORD }),
    )
    .await;
    expect_status(unknown, StatusCode::UNAUTHORIZED).await;
}

// ---------------------------------------------------------------------------
// Bearer resolution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn protected_routes_require_a_token(pool: PgPool) {
    let app = build_test_app(pool);

    let missing = get(&app, "/api/v1/wallet", As::Anonymous).await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let garbage = get(&app, "/api/v1/wallet", As::User("not-a-jwt")).await;
    let json = expect_status(garbage, StatusCode::UNAUTHORIZED).await;
    assert_eq!(json["error"], "Invalid or expired token");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn suspended_account_is_rejected_with_existing_token(pool: PgPool) {
    let app = build_test_app(pool);
    let (user_id, token) = signup_and_login(&app, "suspend@example.com").await;

    let response = post_json(
        &app,
        &format!("/api/v1/admin/users/{user_id}/status"),
        As::Admin,
        json!({ "status": "suspended", "reason": "chargeback" }),
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["status"], "suspended");
    assert_eq!(json["data"]["ban_reason"], "chargeback");

    let wallet = get(&app, "/api/v1/wallet", As::User(&token)).await;
    let json = expect_status(wallet, StatusCode::FORBIDDEN).await;
    assert_eq!(json["code"], "ACCOUNT_INACTIVE");

    let login = post_json(
        &app,
        "/api/v1/auth/login",
        As::Anonymous,
        json!({ "email": "suspend@example.com", "password": PASSWORD }),
    )
    .await;
    expect_status(login, StatusCode::FORBIDDEN).await;

    // Reinstated accounts work again with the same token.
    let response = post_json(
        &app,
        &format!("/api/v1/admin/users/{user_id}/status"),
        As::Admin,
        json!({ "status": "active" }),
    )
    .await;
    expect_status(response, StatusCode::OK).await;
    let wallet = get(&app, "/api/v1/wallet", As::User(&token)).await;
    assert_eq!(wallet.status(), StatusCode::OK);
}
