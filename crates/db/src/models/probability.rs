//! Versioned odds tables: the version header, its rarity tiers and the
//! reward pool drawn from within a tier.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use spinvault_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProbabilityVersion {
    pub id: DbId,
    pub machine_id: DbId,
    pub version_number: i32,
    pub notes: Option<String>,
    pub status: String,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProbabilityTier {
    pub id: DbId,
    pub probability_version_id: DbId,
    pub rarity: String,
    pub weight: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RewardPoolItem {
    pub id: DbId,
    pub probability_version_id: DbId,
    pub reward_id: DbId,
    pub rarity: String,
    pub weight: i64,
}

/// Pool item joined with its catalog name, for display.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PoolItemView {
    pub reward_id: DbId,
    pub name: String,
    pub reward_type: String,
    pub rarity: String,
    pub weight: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTier {
    pub rarity: String,
    pub weight: i64,
}

/// Pool entry as submitted. Rarity is taken from the catalog on insert.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePoolItem {
    pub reward_id: DbId,
    pub weight: i64,
}
