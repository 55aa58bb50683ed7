//! Operator handlers under `/admin`, guarded by the `X-Admin-Key` header.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use spinvault_core::error::CoreError;
use spinvault_core::rewards::RewardMetadata;
use spinvault_core::status::UserStatus;
use spinvault_core::types::DbId;
use spinvault_db::models::machine::{CreateMachine, UpdateMachine};
use spinvault_db::models::probability::{CreatePoolItem, CreateTier};
use spinvault_db::models::reward::CreateReward;
use spinvault_db::models::user::UserResponse;
use spinvault_engine::versions::VersionDraft;

use crate::error::{AppError, AppResult};
use crate::middleware::keys::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/machines`.
#[derive(Debug, Deserialize)]
pub struct CreateMachineInput {
    pub name: String,
    #[serde(default)]
    pub theme: String,
    pub cost_per_spin: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub rules_text: String,
}

fn default_true() -> bool {
    true
}

/// Request body for `PUT /admin/machines/{id}`. Omitted fields are unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMachineInput {
    pub name: Option<String>,
    pub theme: Option<String>,
    pub cost_per_spin: Option<i64>,
    pub is_active: Option<bool>,
    pub rules_text: Option<String>,
}

/// Request body for `POST /admin/machines/{id}/probability/versions`.
#[derive(Debug, Deserialize)]
pub struct CreateVersionInput {
    pub notes: Option<String>,
    pub tiers: Vec<CreateTier>,
    pub rewards: Vec<CreatePoolItem>,
    #[serde(default)]
    pub publish: bool,
}

/// Request body for `POST /admin/rewards`.
#[derive(Debug, Deserialize)]
pub struct CreateRewardInput {
    pub name: String,
    pub rarity: String,
    pub reward_type: String,
    #[serde(default = "empty_object")]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub stackable: bool,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

/// Request body for `POST /admin/users/{id}/adjust-points`.
#[derive(Debug, Deserialize)]
pub struct AdjustPointsInput {
    pub amount: i64,
    #[serde(default)]
    pub reason: String,
}

/// Request body for `POST /admin/users/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UserStatusInput {
    pub status: String,
    pub reason: Option<String>,
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

// ---------------------------------------------------------------------------
// Machines and odds
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/machines
pub async fn create_machine(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateMachineInput>,
) -> AppResult<impl IntoResponse> {
    let machine = state
        .engine
        .create_machine(&CreateMachine {
            name: trimmed(&input.name),
            theme: trimmed(&input.theme),
            cost_per_spin: input.cost_per_spin,
            is_active: input.is_active,
            rules_text: trimmed(&input.rules_text),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: machine })))
}

/// PUT /api/v1/admin/machines/{id}
pub async fn update_machine(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(machine_id): Path<DbId>,
    Json(input): Json<UpdateMachineInput>,
) -> AppResult<impl IntoResponse> {
    let patch = UpdateMachine {
        name: input.name.as_deref().map(trimmed),
        theme: input.theme.as_deref().map(trimmed),
        cost_per_spin: input.cost_per_spin,
        is_active: input.is_active,
        rules_text: input.rules_text.as_deref().map(trimmed),
    };
    let machine = state.engine.update_machine(machine_id, &patch).await?;
    Ok(Json(DataResponse { data: machine }))
}

/// POST /api/v1/admin/machines/{id}/probability/versions
///
/// Create a new odds table, optionally publishing it in the same call.
pub async fn create_version(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(machine_id): Path<DbId>,
    Json(input): Json<CreateVersionInput>,
) -> AppResult<impl IntoResponse> {
    let draft = VersionDraft {
        notes: input.notes,
        tiers: input.tiers,
        pool_items: input.rewards,
        publish: input.publish,
    };
    let version = state.engine.create_version(machine_id, &draft).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: version })))
}

/// GET /api/v1/admin/machines/{id}/probability/versions
pub async fn list_versions(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(machine_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let versions = state.engine.list_versions(machine_id).await?;
    Ok(Json(DataResponse { data: versions }))
}

/// PUT /api/v1/admin/probability/versions/{id}/publish
pub async fn publish_version(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(version_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let version = state.engine.publish_version(version_id).await?;
    Ok(Json(DataResponse { data: version }))
}

/// POST /api/v1/admin/rewards
pub async fn create_reward(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateRewardInput>,
) -> AppResult<impl IntoResponse> {
    let metadata = RewardMetadata::parse(input.reward_type.trim(), &input.metadata)
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    let reward = state
        .engine
        .create_reward(&CreateReward {
            name: trimmed(&input.name),
            rarity: trimmed(&input.rarity),
            metadata,
            stackable: input.stackable,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: reward })))
}

// ---------------------------------------------------------------------------
// Accounts and audit
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users/{id}
///
/// Account, wallet, ledger reconciliation and recent activity.
pub async fn get_user(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let overview = state.engine.user_overview(user_id).await?;
    if !overview.reconciliation.consistent {
        tracing::warn!(
            user_id,
            balance = overview.reconciliation.balance,
            ledger_sum = overview.reconciliation.ledger_sum,
            "Wallet does not match ledger",
        );
    }
    Ok(Json(DataResponse { data: overview }))
}

/// POST /api/v1/admin/users/{id}/adjust-points
pub async fn adjust_points(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<AdjustPointsInput>,
) -> AppResult<impl IntoResponse> {
    let entry = state
        .engine
        .admin_adjust(user_id, input.amount, &input.reason)
        .await?;
    Ok(Json(DataResponse { data: entry }))
}

/// POST /api/v1/admin/users/{id}/status
///
/// Suspend, ban or reinstate an account.
pub async fn set_user_status(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<UserStatusInput>,
) -> AppResult<impl IntoResponse> {
    let status = UserStatus::parse(&input.status.trim().to_ascii_lowercase()).ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "status must be one of active, suspended, banned".into(),
        ))
    })?;
    let user = state
        .engine
        .set_user_status(user_id, status, input.reason.as_deref())
        .await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// GET /api/v1/admin/spins/{id}/verify
pub async fn verify_spin(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(spin_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let verification = state.engine.verify_spin(spin_id).await?;
    Ok(Json(DataResponse { data: verification }))
}
