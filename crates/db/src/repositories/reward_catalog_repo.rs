//! Repository for the `reward_catalog` table.

use sqlx::PgExecutor;
use spinvault_core::types::DbId;

use crate::models::reward::{CreateReward, RewardCatalogEntry};

const COLUMNS: &str = "id, reward_type, name, rarity, metadata, stackable, created_at";

pub struct RewardCatalogRepo;

impl RewardCatalogRepo {
    /// Insert a reward. Type and metadata come from the validated
    /// [`RewardMetadata`](spinvault_core::rewards::RewardMetadata).
    pub async fn create(
        exec: impl PgExecutor<'_>,
        input: &CreateReward,
    ) -> Result<RewardCatalogEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO reward_catalog (reward_type, name, rarity, metadata, stackable)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RewardCatalogEntry>(&query)
            .bind(input.metadata.reward_type())
            .bind(&input.name)
            .bind(&input.rarity)
            .bind(input.metadata.to_json())
            .bind(input.stackable)
            .fetch_one(exec)
            .await
    }

    pub async fn find_by_id(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<RewardCatalogEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reward_catalog WHERE id = $1");
        sqlx::query_as::<_, RewardCatalogEntry>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Ids from `ids` that have no catalog entry.
    pub async fn missing_ids(
        exec: impl PgExecutor<'_>,
        ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT x.id FROM UNNEST($1::BIGINT[]) AS x(id)
             WHERE NOT EXISTS (SELECT 1 FROM reward_catalog r WHERE r.id = x.id)
             ORDER BY x.id",
        )
        .bind(ids)
        .fetch_all(exec)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }
}
