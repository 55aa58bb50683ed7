//! Transactional core of the spin backend.
//!
//! [`Engine`] owns the pool, the spin signer and the lock timeout. Each
//! submodule adds one group of operations:
//!
//! - [`spin`]: execute and verify spins.
//! - [`versions`]: create and publish probability versions.
//! - [`ledger`]: balance mutations paired with ledger entries.
//! - [`guard`]: responsible-gaming limits and self-exclusion.
//! - [`payments`]: order creation and payment webhooks.
//! - [`inventory`]: inventory listing and equip.
//! - [`history`]: player history and the operator account view.
//!
//! Every mutating operation runs in one database transaction that is
//! committed only on success; returning early drops the transaction and
//! rolls it back.

use std::sync::Arc;
use std::time::Duration;

use spinvault_core::signing::SpinSigner;
use spinvault_core::types::DbId;
use spinvault_db::repositories::WalletRepo;
use spinvault_db::DbPool;
use sqlx::{Postgres, Transaction};

pub mod error;
pub mod guard;
pub mod history;
pub mod inventory;
pub mod ledger;
pub mod payments;
pub mod spin;
pub mod versions;

pub use error::{EngineError, EngineResult};

/// Default bound on how long a transaction waits for a row lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(3_000);

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub signing_key: String,
    pub lock_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Engine {
    pool: DbPool,
    signer: Arc<SpinSigner>,
    lock_timeout: Duration,
}

impl Engine {
    pub fn new(pool: DbPool, config: &EngineConfig) -> Self {
        Self {
            pool,
            signer: Arc::new(SpinSigner::new(&config.signing_key)),
            lock_timeout: config.lock_timeout,
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn signer(&self) -> &SpinSigner {
        &self.signer
    }

    /// Begin a transaction with the lock timeout applied.
    pub(crate) async fn begin(&self) -> EngineResult<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await?;
        spinvault_db::set_lock_timeout(&mut *tx, self.lock_timeout).await?;
        Ok(tx)
    }

    /// Begin a transaction holding the user's exclusive wallet lock.
    ///
    /// Returns the transaction and the balance observed under the lock.
    pub(crate) async fn begin_for_user(
        &self,
        user_id: DbId,
    ) -> EngineResult<(Transaction<'static, Postgres>, i64)> {
        let mut tx = self.begin().await?;
        let wallet = WalletRepo::lock(&mut *tx, user_id)
            .await?
            .ok_or(EngineError::UserNotFound(user_id))?;
        Ok((tx, wallet.balance_point))
    }
}
