//! Wallet balance and the append-only ledger beside it.

use serde::Serialize;
use sqlx::FromRow;
use spinvault_core::status::TransactionType;
use spinvault_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Wallet {
    pub user_id: DbId,
    pub balance_point: i64,
    pub updated_at: Timestamp,
}

/// One immutable ledger entry. `amount` is signed: credits are positive.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WalletTransaction {
    pub id: DbId,
    pub user_id: DbId,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub amount: i64,
    pub ref_type: Option<String>,
    pub ref_id: Option<String>,
    pub created_at: Timestamp,
}

/// What a ledger entry points back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRef {
    pub ref_type: String,
    pub ref_id: String,
}

impl LedgerRef {
    pub fn new(ref_type: impl Into<String>, ref_id: impl Into<String>) -> Self {
        Self {
            ref_type: ref_type.into(),
            ref_id: ref_id.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateWalletTransaction {
    pub user_id: DbId,
    pub tx_type: TransactionType,
    pub amount: i64,
    pub reference: Option<LedgerRef>,
}
