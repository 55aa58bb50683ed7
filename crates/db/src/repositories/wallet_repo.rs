//! Repository for the `wallets` table.
//!
//! Balance changes go through [`WalletRepo::apply_delta`], whose `WHERE`
//! clause refuses any update that would leave the balance negative.

use sqlx::PgExecutor;
use spinvault_core::types::DbId;

use crate::models::wallet::Wallet;

const COLUMNS: &str = "user_id, balance_point, updated_at";

pub struct WalletRepo;

impl WalletRepo {
    /// Create an empty wallet for a new user.
    pub async fn create(exec: impl PgExecutor<'_>, user_id: DbId) -> Result<Wallet, sqlx::Error> {
        let query = format!(
            "INSERT INTO wallets (user_id, balance_point) VALUES ($1, 0) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Wallet>(&query)
            .bind(user_id)
            .fetch_one(exec)
            .await
    }

    pub async fn find(
        exec: impl PgExecutor<'_>,
        user_id: DbId,
    ) -> Result<Option<Wallet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wallets WHERE user_id = $1");
        sqlx::query_as::<_, Wallet>(&query)
            .bind(user_id)
            .fetch_optional(exec)
            .await
    }

    /// Take the per-user exclusive lock by locking the wallet row.
    ///
    /// Every operation that reads-then-writes a user's balance, spins or
    /// inventory calls this first in its transaction.
    pub async fn lock(
        exec: impl PgExecutor<'_>,
        user_id: DbId,
    ) -> Result<Option<Wallet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wallets WHERE user_id = $1 FOR UPDATE");
        sqlx::query_as::<_, Wallet>(&query)
            .bind(user_id)
            .fetch_optional(exec)
            .await
    }

    /// Add `delta` (possibly negative) to the balance.
    ///
    /// Returns `None` without changing anything if the wallet is missing or
    /// the result would be below zero.
    pub async fn apply_delta(
        exec: impl PgExecutor<'_>,
        user_id: DbId,
        delta: i64,
    ) -> Result<Option<Wallet>, sqlx::Error> {
        let query = format!(
            "UPDATE wallets SET balance_point = balance_point + $2, updated_at = NOW()
             WHERE user_id = $1 AND balance_point + $2 >= 0
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Wallet>(&query)
            .bind(user_id)
            .bind(delta)
            .fetch_optional(exec)
            .await
    }
}
