use serde::Serialize;
use sqlx::FromRow;
use spinvault_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Machine {
    pub id: DbId,
    pub name: String,
    pub theme: String,
    pub cost_per_spin: i64,
    pub is_active: bool,
    pub rules_text: String,
    /// The live probability version, if one has been published.
    pub probability_version_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateMachine {
    pub name: String,
    pub theme: String,
    pub cost_per_spin: i64,
    pub is_active: bool,
    pub rules_text: String,
}

/// Patch for a machine. All fields optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateMachine {
    pub name: Option<String>,
    pub theme: Option<String>,
    pub cost_per_spin: Option<i64>,
    pub is_active: Option<bool>,
    pub rules_text: Option<String>,
}
