//! Repository for the immutable `spins` table.

use sqlx::PgExecutor;
use spinvault_core::types::DbId;

use crate::models::spin::{CreateSpin, Spin, SpinHistoryEntry};

const COLUMNS: &str = "id, user_id, machine_id, probability_version_id, cost, used_ticket, \
                       result_rarity, result_reward_id, idempotency_key, result_signature, \
                       created_at";

pub struct SpinRepo;

impl SpinRepo {
    /// Insert a spin. A repeated `(user_id, idempotency_key)` fails with the
    /// `uq_spins_user_idempotency` unique violation.
    pub async fn create(
        exec: impl PgExecutor<'_>,
        input: &CreateSpin,
    ) -> Result<Spin, sqlx::Error> {
        let query = format!(
            "INSERT INTO spins
                (user_id, machine_id, probability_version_id, cost, used_ticket,
                 result_rarity, result_reward_id, idempotency_key, result_signature, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Spin>(&query)
            .bind(input.user_id)
            .bind(input.machine_id)
            .bind(input.probability_version_id)
            .bind(input.cost)
            .bind(input.used_ticket)
            .bind(&input.result_rarity)
            .bind(input.result_reward_id)
            .bind(&input.idempotency_key)
            .bind(&input.result_signature)
            .bind(input.created_at)
            .fetch_one(exec)
            .await
    }

    pub async fn find_by_id(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Spin>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM spins WHERE id = $1");
        sqlx::query_as::<_, Spin>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    pub async fn find_by_key(
        exec: impl PgExecutor<'_>,
        user_id: DbId,
        idempotency_key: &str,
    ) -> Result<Option<Spin>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM spins WHERE user_id = $1 AND idempotency_key = $2"
        );
        sqlx::query_as::<_, Spin>(&query)
            .bind(user_id)
            .bind(idempotency_key)
            .fetch_optional(exec)
            .await
    }

    pub async fn count_for_user(
        exec: impl PgExecutor<'_>,
        user_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM spins WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(exec)
            .await?;
        Ok(row.0)
    }

    /// Latest results on a machine, for the machine page.
    pub async fn recent_for_machine(
        exec: impl PgExecutor<'_>,
        machine_id: DbId,
        limit: i64,
    ) -> Result<Vec<SpinHistoryEntry>, sqlx::Error> {
        sqlx::query_as::<_, SpinHistoryEntry>(
            "SELECT s.id, s.machine_id, m.name AS machine_name, s.cost, s.used_ticket,
                    s.result_rarity, s.result_reward_id, r.name AS reward_name, s.created_at
             FROM spins s
             JOIN machines m ON m.id = s.machine_id
             JOIN reward_catalog r ON r.id = s.result_reward_id
             WHERE s.machine_id = $1
             ORDER BY s.id DESC
             LIMIT $2",
        )
        .bind(machine_id)
        .bind(limit)
        .fetch_all(exec)
        .await
    }

    /// Most recent spins first, with machine and reward names.
    pub async fn history(
        exec: impl PgExecutor<'_>,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<SpinHistoryEntry>, sqlx::Error> {
        sqlx::query_as::<_, SpinHistoryEntry>(
            "SELECT s.id, s.machine_id, m.name AS machine_name, s.cost, s.used_ticket,
                    s.result_rarity, s.result_reward_id, r.name AS reward_name, s.created_at
             FROM spins s
             JOIN machines m ON m.id = s.machine_id
             JOIN reward_catalog r ON r.id = s.result_reward_id
             WHERE s.user_id = $1
             ORDER BY s.created_at DESC, s.id DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(exec)
        .await
    }
}
