//! Repository for the `probability_tiers` table.

use sqlx::PgExecutor;
use spinvault_core::types::DbId;

use crate::models::probability::{CreateTier, ProbabilityTier};

const COLUMNS: &str = "id, probability_version_id, rarity, weight";

pub struct ProbabilityTierRepo;

impl ProbabilityTierRepo {
    pub async fn create(
        exec: impl PgExecutor<'_>,
        version_id: DbId,
        input: &CreateTier,
    ) -> Result<ProbabilityTier, sqlx::Error> {
        let query = format!(
            "INSERT INTO probability_tiers (probability_version_id, rarity, weight)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProbabilityTier>(&query)
            .bind(version_id)
            .bind(&input.rarity)
            .bind(input.weight)
            .fetch_one(exec)
            .await
    }

    /// Tiers in insertion order. Selection walks them in this order.
    pub async fn list_by_version(
        exec: impl PgExecutor<'_>,
        version_id: DbId,
    ) -> Result<Vec<ProbabilityTier>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM probability_tiers WHERE probability_version_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, ProbabilityTier>(&query)
            .bind(version_id)
            .fetch_all(exec)
            .await
    }
}
