//! Route definitions for a player's own wallet, inventory and settings.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{inventory, me, wallet};
use crate::state::AppState;

/// Routes mounted at the API root. All require auth.
///
/// ```text
/// GET      /wallet                  -> get_wallet
/// GET      /inventory               -> list_inventory
/// POST     /inventory/equip         -> equip
/// GET, PUT /me/responsible-limit    -> get_limits, put_limits
/// POST     /me/self-exclusion       -> self_exclude
/// GET      /me/history              -> history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/wallet", get(wallet::get_wallet))
        .route("/inventory", get(inventory::list_inventory))
        .route("/inventory/equip", post(inventory::equip))
        .route(
            "/me/responsible-limit",
            get(me::get_limits).put(me::put_limits),
        )
        .route("/me/self-exclusion", post(me::self_exclude))
        .route("/me/history", get(me::history))
}
