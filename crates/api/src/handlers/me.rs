//! Handlers for the player's own `/me` resource: limits, self-exclusion and
//! activity history.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use spinvault_core::error::CoreError;
use spinvault_core::types::Timestamp;
use spinvault_engine::guard::LimitsUpdate;
use spinvault_engine::history::HistoryKind;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `PUT /me/responsible-limit`.
///
/// Caps that are omitted, zero or negative are cleared.
#[derive(Debug, Default, Deserialize)]
pub struct LimitsInput {
    pub daily_charge_limit: Option<i64>,
    pub weekly_charge_limit: Option<i64>,
    pub monthly_charge_limit: Option<i64>,
    pub cooldown_minutes: Option<i64>,
}

/// Request body for `POST /me/self-exclusion`.
#[derive(Debug, Deserialize)]
pub struct SelfExclusionInput {
    pub days: i64,
}

#[derive(Debug, Serialize)]
pub struct SelfExclusionResponse {
    pub self_excluded_until: Timestamp,
}

/// Query parameters for `GET /me/history`.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/me/responsible-limit
pub async fn get_limits(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let limits = state.engine.get_limits(user.user_id).await?;
    Ok(Json(DataResponse { data: limits }))
}

/// PUT /api/v1/me/responsible-limit
///
/// A running cooldown is never shortened by a later call.
pub async fn put_limits(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<LimitsInput>,
) -> AppResult<impl IntoResponse> {
    let update = LimitsUpdate {
        daily_charge_limit: input.daily_charge_limit,
        weekly_charge_limit: input.weekly_charge_limit,
        monthly_charge_limit: input.monthly_charge_limit,
        cooldown_minutes: input.cooldown_minutes,
    };
    let limits = state.engine.set_limits(user.user_id, &update).await?;
    Ok(Json(DataResponse { data: limits }))
}

/// POST /api/v1/me/self-exclusion
pub async fn self_exclude(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SelfExclusionInput>,
) -> AppResult<impl IntoResponse> {
    let until = state
        .engine
        .set_self_exclusion(user.user_id, input.days)
        .await?;
    Ok(Json(DataResponse {
        data: SelfExclusionResponse {
            self_excluded_until: until,
        },
    }))
}

/// GET /api/v1/me/history?type=all|payments|spins|rewards
pub async fn history(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> AppResult<impl IntoResponse> {
    let raw = params.kind.unwrap_or_default();
    let kind = HistoryKind::parse(&raw).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "type must be one of all, payments, spins, rewards (got '{raw}')"
        )))
    })?;
    let history = state.engine.history(user.user_id, kind).await?;
    Ok(Json(DataResponse { data: history }))
}
