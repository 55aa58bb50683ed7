use serde::Serialize;
use sqlx::FromRow;
use spinvault_core::rewards::{MetadataError, RewardMetadata};
use spinvault_core::types::{DbId, Timestamp};

/// A reward catalog row. `metadata` is stored as JSONB; use
/// [`RewardCatalogEntry::typed_metadata`] to interpret it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RewardCatalogEntry {
    pub id: DbId,
    pub reward_type: String,
    pub name: String,
    pub rarity: String,
    pub metadata: serde_json::Value,
    pub stackable: bool,
    pub created_at: Timestamp,
}

impl RewardCatalogEntry {
    pub fn typed_metadata(&self) -> Result<RewardMetadata, MetadataError> {
        RewardMetadata::parse(&self.reward_type, &self.metadata)
    }
}

#[derive(Debug, Clone)]
pub struct CreateReward {
    pub name: String,
    pub rarity: String,
    pub metadata: RewardMetadata,
    pub stackable: bool,
}
