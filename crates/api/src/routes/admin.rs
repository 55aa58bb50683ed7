//! Route definitions for the `/admin` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. All require `X-Admin-Key`.
///
/// ```text
/// POST      /machines                               -> create_machine
/// PUT       /machines/{id}                          -> update_machine
/// GET, POST /machines/{id}/probability/versions     -> list_versions, create_version
/// PUT       /probability/versions/{id}/publish      -> publish_version
/// POST      /rewards                                -> create_reward
/// GET       /users/{id}                             -> get_user
/// POST      /users/{id}/adjust-points               -> adjust_points
/// POST      /users/{id}/status                      -> set_user_status
/// GET       /spins/{id}/verify                      -> verify_spin
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/machines", post(admin::create_machine))
        .route("/machines/{id}", put(admin::update_machine))
        .route(
            "/machines/{id}/probability/versions",
            get(admin::list_versions).post(admin::create_version),
        )
        .route(
            "/probability/versions/{id}/publish",
            put(admin::publish_version),
        )
        .route("/rewards", post(admin::create_reward))
        .route("/users/{id}", get(admin::get_user))
        .route("/users/{id}/adjust-points", post(admin::adjust_points))
        .route("/users/{id}/status", post(admin::set_user_status))
        .route("/spins/{id}/verify", get(admin::verify_spin))
}
