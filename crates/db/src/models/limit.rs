use serde::Serialize;
use sqlx::FromRow;
use spinvault_core::types::{DbId, Timestamp};

/// Per-user charge caps and cooldown. A `None` cap is unlimited.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ResponsibleLimit {
    pub user_id: DbId,
    pub daily_charge_limit: Option<i64>,
    pub weekly_charge_limit: Option<i64>,
    pub monthly_charge_limit: Option<i64>,
    pub cooldown_until: Option<Timestamp>,
    pub updated_at: Timestamp,
}

/// Full replacement of the limit row. Callers normalize caps first.
#[derive(Debug, Clone, Default)]
pub struct UpsertResponsibleLimit {
    pub daily_charge_limit: Option<i64>,
    pub weekly_charge_limit: Option<i64>,
    pub monthly_charge_limit: Option<i64>,
    pub cooldown_until: Option<Timestamp>,
}
