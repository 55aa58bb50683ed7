//! Repository for the `equipped_items` table, keyed by `(user_id, slot)`.

use sqlx::PgExecutor;
use spinvault_core::types::DbId;

use crate::models::inventory::EquippedItem;

const COLUMNS: &str = "user_id, slot, reward_id, updated_at";

pub struct EquippedItemRepo;

impl EquippedItemRepo {
    /// Put `reward_id` into `slot`, replacing whatever was there.
    pub async fn upsert(
        exec: impl PgExecutor<'_>,
        user_id: DbId,
        slot: &str,
        reward_id: DbId,
    ) -> Result<EquippedItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO equipped_items (user_id, slot, reward_id)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, slot) DO UPDATE SET
                reward_id = EXCLUDED.reward_id,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EquippedItem>(&query)
            .bind(user_id)
            .bind(slot)
            .bind(reward_id)
            .fetch_one(exec)
            .await
    }

    pub async fn list(
        exec: impl PgExecutor<'_>,
        user_id: DbId,
    ) -> Result<Vec<EquippedItem>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM equipped_items WHERE user_id = $1 ORDER BY slot");
        sqlx::query_as::<_, EquippedItem>(&query)
            .bind(user_id)
            .fetch_all(exec)
            .await
    }
}
