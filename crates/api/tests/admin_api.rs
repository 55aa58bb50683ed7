//! Integration tests for operator endpoints.
//!
//! - Every admin route requires the `X-Admin-Key` header
//! - Version creation validates weights and can publish in one call
//! - The account view reports ledger reconciliation and spin signatures verify

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Access
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_routes_require_key(pool: PgPool) {
    let app = build_test_app(pool);

    let missing = get(&app, "/api/v1/admin/users/1", As::Anonymous).await;
    let json = expect_status(missing, StatusCode::UNAUTHORIZED).await;
    assert_eq!(json["code"], "UNAUTHORIZED");

    let wrong = send(
        &app,
        axum::http::Method::GET,
        "/api/v1/admin/machines/1/probability/versions",
        As::Webhook,
        None,
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Machines, rewards and versions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn machine_lifecycle(pool: PgPool) {
    let app = build_test_app(pool);

    let created = expect_status(
        post_json(
            &app,
            "/api/v1/admin/machines",
            As::Admin,
            json!({ "name": " Retro Reels ", "theme": "arcade", "cost_per_spin": 250 }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let machine_id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["name"], "Retro Reels");
    assert_eq!(created["data"]["is_active"], true);
    assert!(created["data"]["probability_version_id"].is_null());

    let invalid = post_json(
        &app,
        "/api/v1/admin/machines",
        As::Admin,
        json!({ "name": "Free", "cost_per_spin": 0 }),
    )
    .await;
    expect_status(invalid, StatusCode::BAD_REQUEST).await;

    // No published odds yet.
    let (user_id, token) = signup_and_login(&app, "early@example.com").await;
    fund(&app, user_id, 500).await;
    let early = post_json(
        &app,
        &format!("/api/v1/machines/{machine_id}/spin"),
        As::User(&token),
        json!({ "idempotency_key": "k" }),
    )
    .await;
    let json = expect_status(early, StatusCode::FORBIDDEN).await;
    assert_eq!(json["code"], "NO_PUBLISHED_ODDS");

    let version = expect_status(
        post_json(
            &app,
            &format!("/api/v1/admin/machines/{machine_id}/probability/versions"),
            As::Admin,
            json!({
                "notes": "launch",
                "tiers": [{ "rarity": "Epic", "weight": 1 }],
                "rewards": [{ "reward_id": 3, "weight": 1 }],
                "publish": true
            }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(version["data"]["version_number"], 1);
    assert_eq!(version["data"]["status"], "PUBLISHED");

    let outcome = post_json(
        &app,
        &format!("/api/v1/machines/{machine_id}/spin"),
        As::User(&token),
        json!({ "idempotency_key": "k" }),
    )
    .await;
    let json = expect_status(outcome, StatusCode::OK).await;
    assert_eq!(json["data"]["reward"]["id"], 3);
    assert_eq!(json["data"]["balance_after"], 250);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn version_validation_and_publish(pool: PgPool) {
    let app = build_test_app(pool);
    let versions_uri = format!("/api/v1/admin/machines/{SEED_MACHINE}/probability/versions");

    let zero = post_json(
        &app,
        &versions_uri,
        As::Admin,
        json!({
            "tiers": [{ "rarity": "Common", "weight": 0 }],
            "rewards": [{ "reward_id": 4, "weight": 1 }]
        }),
    )
    .await;
    expect_status(zero, StatusCode::BAD_REQUEST).await;

    let unknown = post_json(
        &app,
        &versions_uri,
        As::Admin,
        json!({
            "tiers": [{ "rarity": "Common", "weight": 1 }],
            "rewards": [{ "reward_id": 999, "weight": 1 }]
        }),
    )
    .await;
    let json = expect_status(unknown, StatusCode::INTERNAL_SERVER_ERROR).await;
    assert_eq!(json["code"], "UNKNOWN_REWARD");

    let draft = expect_status(
        post_json(
            &app,
            &versions_uri,
            As::Admin,
            json!({
                "tiers": [{ "rarity": "Common", "weight": 1 }],
                "rewards": [{ "reward_id": 4, "weight": 1 }]
            }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(draft["data"]["status"], "DRAFT");
    let draft_id = draft["data"]["id"].as_i64().unwrap();

    let published = expect_status(
        put_json(
            &app,
            &format!("/api/v1/admin/probability/versions/{draft_id}/publish"),
            As::Admin,
            json!({}),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(published["data"]["status"], "PUBLISHED");

    let list = expect_status(get(&app, &versions_uri, As::Admin).await, StatusCode::OK).await;
    let statuses: Vec<_> = list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["status"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(statuses.iter().filter(|s| *s == "PUBLISHED").count(), 1);

    let missing = put_json(&app, "/api/v1/admin/probability/versions/999/publish", As::Admin, json!({})).await;
    expect_status(missing, StatusCode::NOT_FOUND).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reward_creation_validates_metadata(pool: PgPool) {
    let app = build_test_app(pool);

    let created = expect_status(
        post_json(
            &app,
            "/api/v1/admin/rewards",
            As::Admin,
            json!({
                "name": "Pixel Hat",
                "rarity": "Rare",
                "reward_type": "cosmetic",
                "metadata": { "slot": "hat" }
            }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(created["data"]["reward_type"], "cosmetic");

    let invalid = post_json(
        &app,
        "/api/v1/admin/rewards",
        As::Admin,
        json!({ "name": "Bad", "rarity": "Rare", "reward_type": "cosmetic", "metadata": [] }),
    )
    .await;
    expect_status(invalid, StatusCode::BAD_REQUEST).await;
}

// ---------------------------------------------------------------------------
// Accounts and audit
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_view_and_adjustments(pool: PgPool) {
    let app = build_test_app(pool);
    let (user_id, token) = signup_and_login(&app, "audited@example.com").await;
    fund(&app, user_id, 300).await;
    expect_status(spin(&app, &token, "k").await, StatusCode::OK).await;

    let below_zero = post_json(
        &app,
        &format!("/api/v1/admin/users/{user_id}/adjust-points"),
        As::Admin,
        json!({ "amount": -1000 }),
    )
    .await;
    let json = expect_status(below_zero, StatusCode::FORBIDDEN).await;
    assert_eq!(json["code"], "INSUFFICIENT_BALANCE");

    let zero = post_json(
        &app,
        &format!("/api/v1/admin/users/{user_id}/adjust-points"),
        As::Admin,
        json!({ "amount": 0 }),
    )
    .await;
    expect_status(zero, StatusCode::BAD_REQUEST).await;

    let view = expect_status(
        get(&app, &format!("/api/v1/admin/users/{user_id}"), As::Admin).await,
        StatusCode::OK,
    )
    .await;
    let data = &view["data"];
    assert_eq!(data["user"]["email"], "audited@example.com");
    assert_eq!(data["wallet"]["balance_point"], 200);
    assert_eq!(data["reconciliation"]["consistent"], true);
    assert_eq!(data["reconciliation"]["ledger_sum"], 200);
    assert_eq!(data["recent_spins"].as_array().unwrap().len(), 1);

    let missing = get(&app, "/api/v1/admin/users/999999", As::Admin).await;
    let json = expect_status(missing, StatusCode::NOT_FOUND).await;
    assert_eq!(json["code"], "USER_NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn spin_signature_verifies(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (user_id, token) = signup_and_login(&app, "verify@example.com").await;
    fund(&app, user_id, 100).await;
    let outcome = expect_status(spin(&app, &token, "k").await, StatusCode::OK).await;
    let spin_id = outcome["data"]["spin"]["id"].as_i64().unwrap();

    let verify_uri = format!("/api/v1/admin/spins/{spin_id}/verify");
    let json = expect_status(get(&app, &verify_uri, As::Admin).await, StatusCode::OK).await;
    assert_eq!(json["data"]["valid"], true);

    sqlx::query("UPDATE spins SET idempotency_key = idempotency_key || '-edited' WHERE id = $1")
        .bind(spin_id)
        .execute(&pool)
        .await
        .unwrap();
    let json = expect_status(get(&app, &verify_uri, As::Admin).await, StatusCode::OK).await;
    assert_eq!(json["data"]["valid"], false);

    let missing = get(&app, "/api/v1/admin/spins/999999/verify", As::Admin).await;
    expect_status(missing, StatusCode::NOT_FOUND).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_status_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);
    let (user_id, _) = signup_and_login(&app, "status@example.com").await;

    let response = post_json(
        &app,
        &format!("/api/v1/admin/users/{user_id}/status"),
        As::Admin,
        json!({ "status": "deleted" }),
    )
    .await;
    expect_status(response, StatusCode::BAD_REQUEST).await;
}
