//! Repository for the `responsible_limits` table (one row per user).

use sqlx::PgExecutor;
use spinvault_core::types::DbId;

use crate::models::limit::{ResponsibleLimit, UpsertResponsibleLimit};

const COLUMNS: &str = "user_id, daily_charge_limit, weekly_charge_limit, \
                       monthly_charge_limit, cooldown_until, updated_at";

pub struct ResponsibleLimitRepo;

impl ResponsibleLimitRepo {
    /// Insert an empty (unlimited, no cooldown) row for a new user.
    pub async fn create_default(
        exec: impl PgExecutor<'_>,
        user_id: DbId,
    ) -> Result<ResponsibleLimit, sqlx::Error> {
        let query = format!(
            "INSERT INTO responsible_limits (user_id) VALUES ($1) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ResponsibleLimit>(&query)
            .bind(user_id)
            .fetch_one(exec)
            .await
    }

    pub async fn find(
        exec: impl PgExecutor<'_>,
        user_id: DbId,
    ) -> Result<Option<ResponsibleLimit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM responsible_limits WHERE user_id = $1");
        sqlx::query_as::<_, ResponsibleLimit>(&query)
            .bind(user_id)
            .fetch_optional(exec)
            .await
    }

    /// Replace every limit field, creating the row if it does not exist.
    pub async fn upsert(
        exec: impl PgExecutor<'_>,
        user_id: DbId,
        input: &UpsertResponsibleLimit,
    ) -> Result<ResponsibleLimit, sqlx::Error> {
        let query = format!(
            "INSERT INTO responsible_limits
                (user_id, daily_charge_limit, weekly_charge_limit, monthly_charge_limit, cooldown_until)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (user_id) DO UPDATE SET
                daily_charge_limit = EXCLUDED.daily_charge_limit,
                weekly_charge_limit = EXCLUDED.weekly_charge_limit,
                monthly_charge_limit = EXCLUDED.monthly_charge_limit,
                cooldown_until = EXCLUDED.cooldown_until,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ResponsibleLimit>(&query)
            .bind(user_id)
            .bind(input.daily_charge_limit)
            .bind(input.weekly_charge_limit)
            .bind(input.monthly_charge_limit)
            .bind(input.cooldown_until)
            .fetch_one(exec)
            .await
    }
}
