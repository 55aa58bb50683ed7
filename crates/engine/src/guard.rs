//! Responsible-gaming enforcement: charge caps, cooldowns and
//! self-exclusion.
//!
//! The predicates live in [`spinvault_core::guardrails`]; this module reads
//! and writes the state they evaluate.

use spinvault_core::guardrails::{
    next_cooldown, next_self_exclusion, normalize_cap, within_cap, ChargeWindow,
};
use spinvault_core::status::UserStatus;
use spinvault_core::types::{now_micros, DbId, Timestamp};
use spinvault_db::models::user::User;
use spinvault_db::models::limit::{ResponsibleLimit, UpsertResponsibleLimit};
use spinvault_db::repositories::{ResponsibleLimitRepo, UserRepo, WalletTransactionRepo};
use sqlx::PgConnection;

use crate::{Engine, EngineError, EngineResult};

/// Requested limits. Caps of `None`, zero or below are stored as unset.
#[derive(Debug, Clone, Default)]
pub struct LimitsUpdate {
    pub daily_charge_limit: Option<i64>,
    pub weekly_charge_limit: Option<i64>,
    pub monthly_charge_limit: Option<i64>,
    pub cooldown_minutes: Option<i64>,
}

/// Reject a charge of `points` that would push any trailing window past its
/// cap. Windows are checked daily, weekly, then monthly; the first breach is
/// reported.
pub async fn check_charge(
    conn: &mut PgConnection,
    user_id: DbId,
    points: i64,
    now: Timestamp,
) -> EngineResult<()> {
    let Some(limits) = ResponsibleLimitRepo::find(&mut *conn, user_id).await? else {
        return Ok(());
    };

    for window in ChargeWindow::ALL {
        let cap = normalize_cap(match window {
            ChargeWindow::Daily => limits.daily_charge_limit,
            ChargeWindow::Weekly => limits.weekly_charge_limit,
            ChargeWindow::Monthly => limits.monthly_charge_limit,
        });
        if cap.is_none() {
            continue;
        }
        let charged =
            WalletTransactionRepo::sum_charges_since(&mut *conn, user_id, window.since(now))
                .await?;
        if !within_cap(cap, charged, points) {
            tracing::info!(user_id, points, charged, window = window.label(), "Charge limit hit");
            return Err(EngineError::ChargeLimitExceeded(window));
        }
    }
    Ok(())
}

impl Engine {
    pub async fn get_limits(&self, user_id: DbId) -> EngineResult<ResponsibleLimit> {
        ResponsibleLimitRepo::find(self.pool(), user_id)
            .await?
            .ok_or(EngineError::UserNotFound(user_id))
    }

    /// Replace the charge caps and optionally start a cooldown.
    ///
    /// A running cooldown is never shortened: a shorter or zero request
    /// keeps the existing expiry.
    pub async fn set_limits(
        &self,
        user_id: DbId,
        update: &LimitsUpdate,
    ) -> EngineResult<ResponsibleLimit> {
        let (mut tx, _) = self.begin_for_user(user_id).await?;
        let current = ResponsibleLimitRepo::find(&mut *tx, user_id).await?;
        let cooldown_until = next_cooldown(
            current.and_then(|l| l.cooldown_until),
            update.cooldown_minutes,
            now_micros(),
        )
        .map_err(EngineError::Validation)?;

        let limits = ResponsibleLimitRepo::upsert(
            &mut *tx,
            user_id,
            &UpsertResponsibleLimit {
                daily_charge_limit: normalize_cap(update.daily_charge_limit),
                weekly_charge_limit: normalize_cap(update.weekly_charge_limit),
                monthly_charge_limit: normalize_cap(update.monthly_charge_limit),
                cooldown_until,
            },
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            user_id,
            cooldown_until = ?limits.cooldown_until,
            "Responsible limits updated"
        );
        Ok(limits)
    }

    /// Exclude the user from play for `days` days. An existing later expiry
    /// is kept.
    pub async fn set_self_exclusion(&self, user_id: DbId, days: i64) -> EngineResult<Timestamp> {
        let (mut tx, _) = self.begin_for_user(user_id).await?;
        let user = UserRepo::find_by_id(&mut *tx, user_id)
            .await?
            .ok_or(EngineError::UserNotFound(user_id))?;
        let until = next_self_exclusion(user.self_excluded_until, days, now_micros())
            .map_err(EngineError::Validation)?;
        let until = UserRepo::set_self_excluded_until(&mut *tx, user_id, until)
            .await?
            .and_then(|u| u.self_excluded_until)
            .ok_or(EngineError::UserNotFound(user_id))?;
        tx.commit().await?;

        tracing::info!(user_id, days, until = %until, "Self-exclusion set");
        Ok(until)
    }

    /// Suspend, ban or reinstate an account. Takes the wallet lock so no
    /// spin of this user is mid-flight when the status changes.
    pub async fn set_user_status(
        &self,
        user_id: DbId,
        status: UserStatus,
        reason: Option<&str>,
    ) -> EngineResult<User> {
        let reason = reason.map(str::trim).filter(|r| !r.is_empty());
        let (mut tx, _) = self.begin_for_user(user_id).await?;
        let user = UserRepo::set_status(&mut *tx, user_id, status, reason)
            .await?
            .ok_or(EngineError::UserNotFound(user_id))?;
        tx.commit().await?;

        tracing::info!(user_id, status = %status, reason, "Account status changed");
        Ok(user)
    }
}
