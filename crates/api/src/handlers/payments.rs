//! Handlers for the `/payments` resource: packages, orders and provider
//! webhooks.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use spinvault_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::keys::RequireWebhookToken;
use crate::middleware::rate_limit;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /payments/orders`.
#[derive(Debug, Deserialize)]
pub struct CreateOrderInput {
    pub package_id: DbId,
    pub provider: Option<String>,
}

/// Request body for `POST /payments/webhook/{provider}`.
#[derive(Debug, Deserialize)]
pub struct WebhookInput {
    pub order_id: String,
    pub status: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// GET /api/v1/payments/packages
pub async fn list_packages(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let packages = state.engine.list_packages().await?;
    Ok(Json(DataResponse { data: packages }))
}

/// POST /api/v1/payments/orders
///
/// Open a CREATED order. Charge caps are enforced here, before the player is
/// sent to the provider.
pub async fn create_order(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateOrderInput>,
) -> AppResult<impl IntoResponse> {
    rate_limit::check_order(&state, user.user_id)?;

    let payment = state
        .engine
        .create_order(user.user_id, input.package_id, input.provider.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: payment })))
}

/// POST /api/v1/payments/webhook/{provider}
///
/// Settle an order. Deliveries for an order that already reached a final
/// status are acknowledged with `idempotent: true` and change nothing.
pub async fn webhook(
    _token: RequireWebhookToken,
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Json(input): Json<WebhookInput>,
) -> AppResult<impl IntoResponse> {
    let outcome = state
        .engine
        .apply_webhook(&provider, input.order_id.trim(), &input.status, &input.payload)
        .await?;
    Ok(Json(DataResponse { data: outcome }))
}
