//! Repository for the `inventory` table.
//!
//! Stackable rewards live in a single row per `(user, reward)` with
//! `source_spin_id IS NULL`; unique rewards get one row per granting spin.

use sqlx::{PgConnection, PgExecutor};
use spinvault_core::rewards::{TICKET_CURRENCY, TYPE_CURRENCY};
use spinvault_core::types::DbId;

use crate::models::inventory::{InventoryItem, InventoryView};

const COLUMNS: &str = "id, user_id, reward_id, qty, source_spin_id, obtained_at";

pub struct InventoryRepo;

impl InventoryRepo {
    /// Add one unit to the user's stack of `reward_id`, creating it if needed.
    pub async fn add_to_stack(
        exec: impl PgExecutor<'_>,
        user_id: DbId,
        reward_id: DbId,
    ) -> Result<InventoryItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO inventory (user_id, reward_id, qty)
             VALUES ($1, $2, 1)
             ON CONFLICT (user_id, reward_id) WHERE source_spin_id IS NULL
             DO UPDATE SET qty = inventory.qty + 1, obtained_at = NOW(), updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(user_id)
            .bind(reward_id)
            .fetch_one(exec)
            .await
    }

    /// Record a non-stackable grant tied to the spin that produced it.
    pub async fn insert_from_spin(
        exec: impl PgExecutor<'_>,
        user_id: DbId,
        reward_id: DbId,
        spin_id: DbId,
    ) -> Result<InventoryItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO inventory (user_id, reward_id, qty, source_spin_id)
             VALUES ($1, $2, 1, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(user_id)
            .bind(reward_id)
            .bind(spin_id)
            .fetch_one(exec)
            .await
    }

    /// Consume one spin ticket from the user's stacks.
    ///
    /// Returns `false` if the user holds no ticket. A stack that reaches zero
    /// is deleted.
    pub async fn consume_ticket(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let taken: Option<(DbId, i64)> = sqlx::query_as(
            "UPDATE inventory SET qty = qty - 1, updated_at = NOW()
             WHERE id = (
                SELECT i.id FROM inventory i
                JOIN reward_catalog r ON r.id = i.reward_id
                WHERE i.user_id = $1
                  AND i.source_spin_id IS NULL
                  AND i.qty > 0
                  AND r.stackable
                  AND r.reward_type = $2
                  AND r.metadata->>'currency' = $3
                ORDER BY i.id
                LIMIT 1
                FOR UPDATE OF i
             )
             RETURNING id, qty",
        )
        .bind(user_id)
        .bind(TYPE_CURRENCY)
        .bind(TICKET_CURRENCY)
        .fetch_optional(&mut *conn)
        .await?;

        let Some((row_id, remaining)) = taken else {
            return Ok(false);
        };
        if remaining == 0 {
            sqlx::query("DELETE FROM inventory WHERE id = $1 AND qty = 0")
                .bind(row_id)
                .execute(&mut *conn)
                .await?;
        }
        Ok(true)
    }

    /// Total quantity of `reward_id` the user holds across all rows.
    pub async fn owned_qty(
        exec: impl PgExecutor<'_>,
        user_id: DbId,
        reward_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(qty), 0)::BIGINT FROM inventory WHERE user_id = $1 AND reward_id = $2",
        )
        .bind(user_id)
        .bind(reward_id)
        .fetch_one(exec)
        .await?;
        Ok(row.0)
    }

    /// Inventory with catalog details, optionally filtered by rarity and type.
    pub async fn list_view(
        exec: impl PgExecutor<'_>,
        user_id: DbId,
        rarity: Option<&str>,
        reward_type: Option<&str>,
    ) -> Result<Vec<InventoryView>, sqlx::Error> {
        sqlx::query_as::<_, InventoryView>(
            "SELECT i.id, i.reward_id, i.qty, i.source_spin_id, i.obtained_at,
                    r.name, r.reward_type, r.rarity, r.metadata, r.stackable
             FROM inventory i
             JOIN reward_catalog r ON r.id = i.reward_id
             WHERE i.user_id = $1
               AND i.qty > 0
               AND ($2::TEXT IS NULL OR r.rarity = $2)
               AND ($3::TEXT IS NULL OR r.reward_type = $3)
             ORDER BY i.obtained_at DESC, i.id DESC",
        )
        .bind(user_id)
        .bind(rarity)
        .bind(reward_type)
        .fetch_all(exec)
        .await
    }
}
