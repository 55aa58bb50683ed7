//! Wallet ledger: every balance change is paired with exactly one
//! `wallet_transactions` row inside the same transaction.
//!
//! [`charge`] and [`spend`] take an open connection so spins and payment
//! webhooks compose them into their own transactions. The caller must already
//! hold the wallet lock.

use serde::Serialize;
use spinvault_core::status::TransactionType;
use spinvault_core::types::DbId;
use spinvault_db::models::wallet::{CreateWalletTransaction, LedgerRef, Wallet, WalletTransaction};
use spinvault_db::repositories::{WalletRepo, WalletTransactionRepo};
use sqlx::PgConnection;

use crate::{Engine, EngineError, EngineResult};

/// Entries shown in the wallet view.
pub const RECENT_TRANSACTIONS: i64 = 30;

pub const REF_PAYMENT: &str = "PAYMENT";
pub const REF_SPIN: &str = "SPIN";
pub const REF_ADMIN: &str = "ADMIN";

/// A balance mutation and the ledger row recording it.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntry {
    pub wallet: Wallet,
    pub transaction: WalletTransaction,
}

#[derive(Debug, Clone, Serialize)]
pub struct WalletView {
    pub wallet: Wallet,
    pub recent_transactions: Vec<WalletTransaction>,
}

/// Balance against the ledger sum. They agree unless the store was edited
/// outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub balance: i64,
    pub ledger_sum: i64,
    pub consistent: bool,
}

/// Apply `delta` and append the ledger row. `None` if the result would go
/// below zero.
async fn apply(
    conn: &mut PgConnection,
    user_id: DbId,
    tx_type: TransactionType,
    delta: i64,
    reference: LedgerRef,
) -> EngineResult<Option<LedgerEntry>> {
    let Some(wallet) = WalletRepo::apply_delta(&mut *conn, user_id, delta).await? else {
        return Ok(None);
    };
    let transaction = WalletTransactionRepo::create(
        &mut *conn,
        &CreateWalletTransaction {
            user_id,
            tx_type,
            amount: delta,
            reference: Some(reference),
        },
    )
    .await?;
    Ok(Some(LedgerEntry {
        wallet,
        transaction,
    }))
}

/// Current balance. Read under the wallet lock for a consistent value.
pub async fn balance(conn: &mut PgConnection, user_id: DbId) -> EngineResult<i64> {
    WalletRepo::find(conn, user_id)
        .await?
        .map(|w| w.balance_point)
        .ok_or(EngineError::UserNotFound(user_id))
}

/// Credit purchased points.
pub async fn charge(
    conn: &mut PgConnection,
    user_id: DbId,
    amount: i64,
    reference: LedgerRef,
) -> EngineResult<LedgerEntry> {
    if amount <= 0 {
        return Err(EngineError::validation("charge amount must be > 0"));
    }
    apply(conn, user_id, TransactionType::Charge, amount, reference)
        .await?
        .ok_or(EngineError::UserNotFound(user_id))
}

/// Debit `cost` only if the balance covers it.
pub async fn spend(
    conn: &mut PgConnection,
    user_id: DbId,
    cost: i64,
    reference: LedgerRef,
) -> EngineResult<LedgerEntry> {
    if cost <= 0 {
        return Err(EngineError::validation("spend amount must be > 0"));
    }
    match apply(&mut *conn, user_id, TransactionType::Spend, -cost, reference).await? {
        Some(entry) => Ok(entry),
        None => {
            let balance = balance(conn, user_id).await?;
            Err(EngineError::InsufficientPoints { balance, cost })
        }
    }
}

impl Engine {
    /// Signed manual correction by an operator. Rejected if it would leave
    /// the balance negative.
    pub async fn admin_adjust(
        &self,
        user_id: DbId,
        amount: i64,
        reason: &str,
    ) -> EngineResult<LedgerEntry> {
        if amount == 0 {
            return Err(EngineError::validation("amount must not be 0"));
        }
        let reason = match reason.trim() {
            "" => "admin-adjust",
            r => r,
        };

        let (mut tx, balance) = self.begin_for_user(user_id).await?;
        let entry = apply(
            &mut *tx,
            user_id,
            TransactionType::Adjust,
            amount,
            LedgerRef::new(REF_ADMIN, reason),
        )
        .await?
        .ok_or(EngineError::InsufficientBalance {
            balance,
            delta: amount,
        })?;
        tx.commit().await?;

        tracing::info!(
            user_id,
            amount,
            reason,
            balance = entry.wallet.balance_point,
            "Admin adjustment applied"
        );
        Ok(entry)
    }

    pub async fn wallet_view(&self, user_id: DbId) -> EngineResult<WalletView> {
        let wallet = WalletRepo::find(self.pool(), user_id)
            .await?
            .ok_or(EngineError::UserNotFound(user_id))?;
        let recent_transactions =
            WalletTransactionRepo::list_recent(self.pool(), user_id, RECENT_TRANSACTIONS).await?;
        Ok(WalletView {
            wallet,
            recent_transactions,
        })
    }

    /// Compare the balance with the ledger sum under the wallet lock.
    pub async fn reconcile(&self, user_id: DbId) -> EngineResult<Reconciliation> {
        let (mut tx, balance) = self.begin_for_user(user_id).await?;
        let ledger_sum = WalletTransactionRepo::sum_for_user(&mut *tx, user_id).await?;
        tx.commit().await?;

        let consistent = balance == ledger_sum;
        if !consistent {
            tracing::warn!(user_id, balance, ledger_sum, "Wallet balance disagrees with ledger");
        }
        Ok(Reconciliation {
            balance,
            ledger_sum,
            consistent,
        })
    }
}
