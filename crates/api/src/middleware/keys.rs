//! Shared-secret header extractors for operator and payment-provider calls.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use spinvault_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";
pub const WEBHOOK_TOKEN_HEADER: &str = "x-webhook-token";

/// Compare without short-circuiting on the first differing byte.
fn secret_matches(given: &[u8], expected: &[u8]) -> bool {
    if given.len() != expected.len() {
        return false;
    }
    given
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

fn check_header(parts: &Parts, name: &str, expected: &str) -> Result<(), AppError> {
    let given = parts
        .headers
        .get(name)
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(format!("Missing {name} header"))))?;

    if !secret_matches(given.as_bytes(), expected.as_bytes()) {
        return Err(AppError::Core(CoreError::Forbidden(format!("Invalid {name}"))));
    }
    Ok(())
}

/// Requires a valid `X-Admin-Key`. Missing → 401, wrong → 403.
///
/// ```ignore
/// async fn admin_only(_: RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        check_header(parts, ADMIN_KEY_HEADER, &state.config.admin_key)?;
        Ok(RequireAdmin)
    }
}

/// Requires a valid `X-Webhook-Token` from the payment provider.
pub struct RequireWebhookToken;

impl FromRequestParts<AppState> for RequireWebhookToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        check_header(parts, WEBHOOK_TOKEN_HEADER, &state.config.webhook_token)?;
        Ok(RequireWebhookToken)
    }
}
