use serde::Serialize;
use sqlx::FromRow;
use spinvault_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryItem {
    pub id: DbId,
    pub user_id: DbId,
    pub reward_id: DbId,
    pub qty: i64,
    pub source_spin_id: Option<DbId>,
    pub obtained_at: Timestamp,
}

/// Inventory row joined with its catalog entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryView {
    pub id: DbId,
    pub reward_id: DbId,
    pub qty: i64,
    pub source_spin_id: Option<DbId>,
    pub obtained_at: Timestamp,
    pub name: String,
    pub reward_type: String,
    pub rarity: String,
    pub metadata: serde_json::Value,
    pub stackable: bool,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EquippedItem {
    pub user_id: DbId,
    pub slot: String,
    pub reward_id: DbId,
    pub updated_at: Timestamp,
}
