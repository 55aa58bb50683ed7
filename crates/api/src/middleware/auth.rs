//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use spinvault_core::error::CoreError;
use spinvault_core::types::DbId;
use spinvault_db::repositories::UserRepo;
use spinvault_engine::EngineError;

use crate::auth::token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated, active user extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// The account is loaded on every request, so a suspension or ban takes
/// effect immediately even for tokens issued earlier:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    pub email: String,
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let bearer = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

        let user_id = token::player_id(bearer, &state.config.token)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        let user = UserRepo::find_by_id(&state.pool, user_id)
            .await?
            .ok_or_else(|| unauthorized("Account no longer exists"))?;

        if !user.is_active() {
            tracing::debug!(user_id = user.id, status = %user.status, "Rejected inactive account");
            return Err(AppError::Engine(EngineError::AccountInactive {
                status: user.status,
            }));
        }

        Ok(AuthUser {
            user_id: user.id,
            email: user.email,
        })
    }
}
