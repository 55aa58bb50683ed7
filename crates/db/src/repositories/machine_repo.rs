//! Repository for the `machines` table.

use sqlx::PgExecutor;
use spinvault_core::types::DbId;

use crate::models::machine::{CreateMachine, Machine, UpdateMachine};

const COLUMNS: &str = "id, name, theme, cost_per_spin, is_active, rules_text, \
                       probability_version_id, created_at, updated_at";

pub struct MachineRepo;

impl MachineRepo {
    pub async fn create(
        exec: impl PgExecutor<'_>,
        input: &CreateMachine,
    ) -> Result<Machine, sqlx::Error> {
        let query = format!(
            "INSERT INTO machines (name, theme, cost_per_spin, is_active, rules_text)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Machine>(&query)
            .bind(&input.name)
            .bind(&input.theme)
            .bind(input.cost_per_spin)
            .bind(input.is_active)
            .bind(&input.rules_text)
            .fetch_one(exec)
            .await
    }

    pub async fn find_by_id(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Machine>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM machines WHERE id = $1");
        sqlx::query_as::<_, Machine>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Lock the machine row. Version creation and publishing for one machine
    /// serialize on this lock.
    pub async fn lock(exec: impl PgExecutor<'_>, id: DbId) -> Result<Option<Machine>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM machines WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Machine>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    pub async fn list_active(exec: impl PgExecutor<'_>) -> Result<Vec<Machine>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM machines WHERE is_active ORDER BY id");
        sqlx::query_as::<_, Machine>(&query).fetch_all(exec).await
    }

    /// Update a machine. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        exec: impl PgExecutor<'_>,
        id: DbId,
        input: &UpdateMachine,
    ) -> Result<Option<Machine>, sqlx::Error> {
        let query = format!(
            "UPDATE machines SET
                name = COALESCE($2, name),
                theme = COALESCE($3, theme),
                cost_per_spin = COALESCE($4, cost_per_spin),
                is_active = COALESCE($5, is_active),
                rules_text = COALESCE($6, rules_text),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Machine>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.theme)
            .bind(input.cost_per_spin)
            .bind(input.is_active)
            .bind(&input.rules_text)
            .fetch_optional(exec)
            .await
    }

    /// Point the machine at a newly published version.
    pub async fn set_live_version(
        exec: impl PgExecutor<'_>,
        id: DbId,
        version_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE machines SET probability_version_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(version_id)
        .execute(exec)
        .await?;
        Ok(())
    }
}
