//! Repository for the append-only `wallet_transactions` ledger.

use sqlx::PgExecutor;
use spinvault_core::status::TransactionType;
use spinvault_core::types::{DbId, Timestamp};

use crate::models::wallet::{CreateWalletTransaction, WalletTransaction};

const COLUMNS: &str = "id, user_id, tx_type, amount, ref_type, ref_id, created_at";

pub struct WalletTransactionRepo;

impl WalletTransactionRepo {
    pub async fn create(
        exec: impl PgExecutor<'_>,
        input: &CreateWalletTransaction,
    ) -> Result<WalletTransaction, sqlx::Error> {
        let query = format!(
            "INSERT INTO wallet_transactions (user_id, tx_type, amount, ref_type, ref_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let (ref_type, ref_id) = match &input.reference {
            Some(r) => (Some(r.ref_type.as_str()), Some(r.ref_id.as_str())),
            None => (None, None),
        };
        sqlx::query_as::<_, WalletTransaction>(&query)
            .bind(input.user_id)
            .bind(input.tx_type.as_str())
            .bind(input.amount)
            .bind(ref_type)
            .bind(ref_id)
            .fetch_one(exec)
            .await
    }

    /// Most recent entries first.
    pub async fn list_recent(
        exec: impl PgExecutor<'_>,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<WalletTransaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM wallet_transactions
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, WalletTransaction>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(exec)
            .await
    }

    /// Sum of every ledger amount for the user.
    pub async fn sum_for_user(
        exec: impl PgExecutor<'_>,
        user_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount), 0)::BIGINT FROM wallet_transactions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(exec)
        .await?;
        Ok(row.0)
    }

    /// Total `CHARGE` amount recorded at or after `since`.
    pub async fn sum_charges_since(
        exec: impl PgExecutor<'_>,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount), 0)::BIGINT FROM wallet_transactions
             WHERE user_id = $1 AND tx_type = $2 AND created_at >= $3",
        )
        .bind(user_id)
        .bind(TransactionType::Charge.as_str())
        .bind(since)
        .fetch_one(exec)
        .await?;
        Ok(row.0)
    }
}
