//! Handlers for the `/auth` resource (signup, login).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use spinvault_core::error::CoreError;
use spinvault_db::models::user::{CreateUser, UserResponse};
use spinvault_db::repositories::{ResponsibleLimitRepo, UserRepo, WalletRepo};
use validator::Validate;

use crate::auth::{password, token};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub age_verified: bool,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Create an account with an empty wallet and no spending limits. A taken
/// email is rejected with 409 by the `uq_users_email` constraint.
pub async fn signup(
    State(state): State<AppState>,
    Json(mut input): Json<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    input.email = normalize_email(&input.email);
    input.validate()?;
    password::check_policy(&input.password)?;

    let password_hash = password::hash(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let mut tx = state.pool.begin().await?;
    let user = UserRepo::create(
        &mut *tx,
        &CreateUser {
            email: input.email,
            password_hash,
            age_verified: input.age_verified,
        },
    )
    .await?;
    WalletRepo::create(&mut *tx, user.id).await?;
    ResponsibleLimitRepo::create_default(&mut *tx, user.id).await?;
    tx.commit().await?;

    tracing::info!(user_id = user.id, "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Suspended and banned accounts cannot
/// log in.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = normalize_email(&input.email);
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_valid = password::matches(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid_credentials());
    }

    if !user.is_active() {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Account is {}",
            user.status
        ))));
    }

    let issued = token::issue(user.id, &state.config.token)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse {
        access_token: issued.token,
        expires_in: issued.expires_in,
        user: user.into(),
    }))
}
