//! Route definitions for the `/payments` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::payments;
use crate::state::AppState;

/// Routes mounted at `/payments`.
///
/// ```text
/// GET  /packages             -> list_packages
/// POST /orders               -> create_order (requires auth)
/// POST /webhook/{provider}   -> webhook (requires X-Webhook-Token)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/packages", get(payments::list_packages))
        .route("/orders", post(payments::create_order))
        .route("/webhook/{provider}", post(payments::webhook))
}
