//! Shared fixtures for engine integration tests.
//!
//! The seed migration provides machine 1 ("Neon Jackpot", 100 points per
//! spin) with published version 1, rewards 1 to 6 (5 is the spin ticket) and
//! packages 1 to 3.

#![allow(dead_code)]

use std::time::Duration;

use spinvault_core::types::DbId;
use spinvault_db::models::user::CreateUser;
use spinvault_db::repositories::{ResponsibleLimitRepo, UserRepo, WalletRepo};
use spinvault_engine::spin::SpinRequest;
use spinvault_engine::{Engine, EngineConfig};
use sqlx::PgPool;

pub const SEED_MACHINE: DbId = 1;
pub const SEED_COST: i64 = 100;
pub const TICKET_REWARD: DbId = 5;
pub const STARTER_PACKAGE: DbId = 1;
pub const STARTER_POINTS: i64 = 5_500;

pub fn engine(pool: &PgPool) -> Engine {
    Engine::new(
        pool.clone(),
        &EngineConfig {
            signing_key: "test-signing-key".to_string(),
            lock_timeout: Duration::from_secs(5),
        },
    )
}

/// A player with an empty wallet and an empty limit row.
pub async fn new_user(pool: &PgPool, email: &str) -> DbId {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            age_verified: true,
        },
    )
    .await
    .unwrap();
    WalletRepo::create(pool, user.id).await.unwrap();
    ResponsibleLimitRepo::create_default(pool, user.id).await.unwrap();
    user.id
}

/// A player holding `points`, credited through an admin adjustment.
pub async fn funded_user(engine: &Engine, email: &str, points: i64) -> DbId {
    let user_id = new_user(engine.pool(), email).await;
    if points > 0 {
        engine.admin_adjust(user_id, points, "test funding").await.unwrap();
    }
    user_id
}

pub fn spin_req(user_id: DbId, key: &str) -> SpinRequest {
    SpinRequest {
        user_id,
        machine_id: SEED_MACHINE,
        idempotency_key: key.to_string(),
        use_ticket: false,
    }
}

pub async fn balance(pool: &PgPool, user_id: DbId) -> i64 {
    WalletRepo::find(pool, user_id).await.unwrap().unwrap().balance_point
}

pub async fn count(pool: &PgPool, sql: &str, user_id: DbId) -> i64 {
    sqlx::query_scalar(sql).bind(user_id).fetch_one(pool).await.unwrap()
}

pub async fn spin_count(pool: &PgPool, user_id: DbId) -> i64 {
    count(pool, "SELECT COUNT(*) FROM spins WHERE user_id = $1", user_id).await
}

pub async fn ledger_count(pool: &PgPool, user_id: DbId) -> i64 {
    count(pool, "SELECT COUNT(*) FROM wallet_transactions WHERE user_id = $1", user_id).await
}
