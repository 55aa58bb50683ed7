//! Handlers for the public `/machines` resource and the spin action.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use spinvault_core::types::DbId;
use spinvault_db::repositories::MachineRepo;
use spinvault_engine::spin::SpinRequest;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rate_limit;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /machines/{id}/spin`.
#[derive(Debug, Deserialize)]
pub struct SpinInput {
    pub idempotency_key: String,
    #[serde(default)]
    pub use_ticket: bool,
}

/// GET /api/v1/machines
pub async fn list_machines(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let machines = MachineRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: machines }))
}

/// GET /api/v1/machines/{id}
///
/// Machine details with the live odds table and the latest wins.
pub async fn get_machine(
    State(state): State<AppState>,
    Path(machine_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let view = state.engine.machine_view(machine_id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/machines/{id}/spin
///
/// Execute one spin. Repeating a request with the same `idempotency_key`
/// returns the original result without charging again.
pub async fn spin(
    user: AuthUser,
    State(state): State<AppState>,
    Path(machine_id): Path<DbId>,
    Json(input): Json<SpinInput>,
) -> AppResult<impl IntoResponse> {
    rate_limit::check_spin(&state, user.user_id)?;

    let outcome = state
        .engine
        .execute_spin(&SpinRequest {
            user_id: user.user_id,
            machine_id,
            idempotency_key: input.idempotency_key,
            use_ticket: input.use_ticket,
        })
        .await?;

    Ok(Json(DataResponse { data: outcome }))
}
