//! Handlers for the `/inventory` resource.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use spinvault_core::types::DbId;
use spinvault_engine::inventory::InventoryFilter;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /inventory`.
#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    pub rarity: Option<String>,
    #[serde(rename = "type")]
    pub reward_type: Option<String>,
}

/// Request body for `POST /inventory/equip`.
#[derive(Debug, Deserialize)]
pub struct EquipInput {
    pub slot: String,
    pub reward_id: DbId,
}

/// GET /api/v1/inventory?rarity=&type=
pub async fn list_inventory(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<InventoryQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = InventoryFilter {
        rarity: params.rarity,
        reward_type: params.reward_type,
    };
    let listing = state.engine.list_inventory(user.user_id, &filter).await?;
    Ok(Json(DataResponse { data: listing }))
}

/// POST /api/v1/inventory/equip
pub async fn equip(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<EquipInput>,
) -> AppResult<impl IntoResponse> {
    let equipped = state
        .engine
        .equip(user.user_id, &input.slot, input.reward_id)
        .await?;
    Ok(Json(DataResponse { data: equipped }))
}
