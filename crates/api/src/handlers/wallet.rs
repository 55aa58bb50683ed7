//! Handler for the player's own wallet.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/wallet
///
/// Current balance and the most recent ledger entries.
pub async fn get_wallet(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let view = state.engine.wallet_view(user.user_id).await?;
    Ok(Json(DataResponse { data: view }))
}
