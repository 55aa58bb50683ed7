use serde::Serialize;
use sqlx::FromRow;
use spinvault_core::signing::SpinClaim;
use spinvault_core::types::{DbId, Timestamp};

/// An immutable spin record.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Spin {
    pub id: DbId,
    pub user_id: DbId,
    pub machine_id: DbId,
    pub probability_version_id: DbId,
    pub cost: i64,
    pub used_ticket: bool,
    pub result_rarity: String,
    pub result_reward_id: DbId,
    pub idempotency_key: String,
    pub result_signature: String,
    pub created_at: Timestamp,
}

impl Spin {
    /// The signed fields of this row.
    pub fn claim(&self) -> SpinClaim<'_> {
        SpinClaim {
            user_id: self.user_id,
            machine_id: self.machine_id,
            probability_version_id: self.probability_version_id,
            reward_id: self.result_reward_id,
            rarity: &self.result_rarity,
            created_at: self.created_at,
            idempotency_key: &self.idempotency_key,
        }
    }
}

/// Spin joined with machine and reward names for the history view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SpinHistoryEntry {
    pub id: DbId,
    pub machine_id: DbId,
    pub machine_name: String,
    pub cost: i64,
    pub used_ticket: bool,
    pub result_rarity: String,
    pub result_reward_id: DbId,
    pub reward_name: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateSpin {
    pub user_id: DbId,
    pub machine_id: DbId,
    pub probability_version_id: DbId,
    pub cost: i64,
    pub used_ticket: bool,
    pub result_rarity: String,
    pub result_reward_id: DbId,
    pub idempotency_key: String,
    pub result_signature: String,
    pub created_at: Timestamp,
}
