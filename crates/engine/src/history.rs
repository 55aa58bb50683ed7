//! Read-only activity views for players and operators.

use serde::Serialize;
use spinvault_core::types::DbId;
use spinvault_db::models::inventory::InventoryView;
use spinvault_db::models::payment::Payment;
use spinvault_db::models::spin::SpinHistoryEntry;
use spinvault_db::models::user::UserResponse;
use spinvault_db::models::wallet::Wallet;
use spinvault_db::repositories::{InventoryRepo, PaymentRepo, SpinRepo, UserRepo, WalletRepo};

use crate::ledger::Reconciliation;
use crate::{Engine, EngineError, EngineResult};

/// Entries per section of the player history.
pub const HISTORY_LIMIT: i64 = 50;

/// Entries per section of the operator view.
pub const OVERVIEW_LIMIT: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryKind {
    #[default]
    All,
    Payments,
    Spins,
    Rewards,
}

impl HistoryKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Some(Self::All),
            "payments" => Some(Self::Payments),
            "spins" => Some(Self::Spins),
            "rewards" => Some(Self::Rewards),
            _ => None,
        }
    }

    fn includes(self, other: HistoryKind) -> bool {
        self == HistoryKind::All || self == other
    }
}

/// Sections not requested are omitted from the serialized form.
#[derive(Debug, Clone, Default, Serialize)]
pub struct History {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payments: Option<Vec<Payment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spins: Option<Vec<SpinHistoryEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewards: Option<Vec<InventoryView>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserOverview {
    pub user: UserResponse,
    pub wallet: Wallet,
    pub reconciliation: Reconciliation,
    pub recent_spins: Vec<SpinHistoryEntry>,
    pub recent_payments: Vec<Payment>,
}

impl Engine {
    pub async fn history(&self, user_id: DbId, kind: HistoryKind) -> EngineResult<History> {
        let mut history = History::default();
        if kind.includes(HistoryKind::Payments) {
            history.payments =
                Some(PaymentRepo::list_by_user(self.pool(), user_id, HISTORY_LIMIT).await?);
        }
        if kind.includes(HistoryKind::Spins) {
            history.spins = Some(SpinRepo::history(self.pool(), user_id, HISTORY_LIMIT).await?);
        }
        if kind.includes(HistoryKind::Rewards) {
            let mut rewards = InventoryRepo::list_view(self.pool(), user_id, None, None).await?;
            rewards.truncate(HISTORY_LIMIT as usize);
            history.rewards = Some(rewards);
        }
        Ok(history)
    }

    /// Everything support needs to look at one account.
    pub async fn user_overview(&self, user_id: DbId) -> EngineResult<UserOverview> {
        let user = UserRepo::find_by_id(self.pool(), user_id)
            .await?
            .ok_or(EngineError::UserNotFound(user_id))?;
        let reconciliation = self.reconcile(user_id).await?;
        let wallet = WalletRepo::find(self.pool(), user_id)
            .await?
            .ok_or(EngineError::UserNotFound(user_id))?;
        let recent_spins = SpinRepo::history(self.pool(), user_id, OVERVIEW_LIMIT).await?;
        let recent_payments = PaymentRepo::list_by_user(self.pool(), user_id, OVERVIEW_LIMIT).await?;

        Ok(UserOverview {
            user: user.into(),
            wallet,
            reconciliation,
            recent_spins,
            recent_payments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parsing() {
        assert_eq!(HistoryKind::parse("Spins"), Some(HistoryKind::Spins));
        assert_eq!(HistoryKind::parse(""), Some(HistoryKind::All));
        assert_eq!(HistoryKind::parse("trades"), None);
    }

    #[test]
    fn all_includes_every_section() {
        assert!(HistoryKind::All.includes(HistoryKind::Rewards));
        assert!(!HistoryKind::Spins.includes(HistoryKind::Payments));
    }
}
