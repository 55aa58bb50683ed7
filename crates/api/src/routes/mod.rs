pub mod admin;
pub mod auth;
pub mod health;
pub mod machines;
pub mod payments;
pub mod player;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup, /auth/login                        public
///
/// /machines                                        list (public)
/// /machines/{id}                                   live odds + recent wins (public)
/// /machines/{id}/spin                              spin (requires auth)
///
/// /wallet                                          balance + ledger (requires auth)
/// /inventory, /inventory/equip                     items, equip (requires auth)
/// /me/responsible-limit                            get, put (requires auth)
/// /me/self-exclusion                               post (requires auth)
/// /me/history                                      ?type= (requires auth)
///
/// /payments/packages                               list (public)
/// /payments/orders                                 create (requires auth)
/// /payments/webhook/{provider}                     provider callback (X-Webhook-Token)
///
/// /admin/...                                       operator tools (X-Admin-Key)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/machines", machines::router())
        .merge(player::router())
        .nest("/payments", payments::router())
        .nest("/admin", admin::router())
}
