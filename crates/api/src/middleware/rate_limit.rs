//! Per-user request budgets for spins and order creation.

use spinvault_core::rate_limit::DEFAULT_WINDOW;
use spinvault_core::types::DbId;

use crate::error::AppResult;
use crate::state::AppState;

pub const SPIN_SCOPE: &str = "spin";
pub const ORDER_SCOPE: &str = "order";

/// Count one spin request against the user's per-minute budget.
pub fn check_spin(state: &AppState, user_id: DbId) -> AppResult<()> {
    check(state, SPIN_SCOPE, user_id, state.config.spin_rate_limit)
}

/// Count one order creation against the user's per-minute budget.
pub fn check_order(state: &AppState, user_id: DbId) -> AppResult<()> {
    check(state, ORDER_SCOPE, user_id, state.config.order_rate_limit)
}

fn check(state: &AppState, scope: &'static str, user_id: DbId, limit: usize) -> AppResult<()> {
    state
        .limiter
        .check(scope, &user_id.to_string(), limit, DEFAULT_WINDOW)
        .map_err(|limited| {
            tracing::warn!(user_id, scope, retry_after = ?limited.retry_after, "Rate limited");
            limited.into()
        })
}
