//! Repository for the `reward_pool_items` table.

use sqlx::PgExecutor;
use spinvault_core::types::DbId;

use crate::models::probability::{PoolItemView, RewardPoolItem};

const COLUMNS: &str = "id, probability_version_id, reward_id, rarity, weight";

pub struct RewardPoolRepo;

impl RewardPoolRepo {
    /// Insert a pool item whose rarity is copied from the reward catalog.
    ///
    /// Returns `None` if `reward_id` is not in the catalog.
    pub async fn create_from_catalog(
        exec: impl PgExecutor<'_>,
        version_id: DbId,
        reward_id: DbId,
        weight: i64,
    ) -> Result<Option<RewardPoolItem>, sqlx::Error> {
        let query = format!(
            "INSERT INTO reward_pool_items (probability_version_id, reward_id, rarity, weight)
             SELECT $1, r.id, r.rarity, $3 FROM reward_catalog r WHERE r.id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RewardPoolItem>(&query)
            .bind(version_id)
            .bind(reward_id)
            .bind(weight)
            .fetch_optional(exec)
            .await
    }

    /// Pool items in insertion order.
    pub async fn list_by_version(
        exec: impl PgExecutor<'_>,
        version_id: DbId,
    ) -> Result<Vec<RewardPoolItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reward_pool_items WHERE probability_version_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, RewardPoolItem>(&query)
            .bind(version_id)
            .fetch_all(exec)
            .await
    }

    /// Pool items joined with reward names, for display.
    pub async fn list_view_by_version(
        exec: impl PgExecutor<'_>,
        version_id: DbId,
    ) -> Result<Vec<PoolItemView>, sqlx::Error> {
        sqlx::query_as::<_, PoolItemView>(
            "SELECT p.reward_id, r.name, r.reward_type, p.rarity, p.weight
             FROM reward_pool_items p
             JOIN reward_catalog r ON r.id = p.reward_id
             WHERE p.probability_version_id = $1
             ORDER BY p.id",
        )
        .bind(version_id)
        .fetch_all(exec)
        .await
    }
}
