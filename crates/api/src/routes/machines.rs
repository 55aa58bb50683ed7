//! Route definitions for the `/machines` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::machines;
use crate::state::AppState;

/// Routes mounted at `/machines`.
///
/// ```text
/// GET  /            -> list_machines
/// GET  /{id}        -> get_machine
/// POST /{id}/spin   -> spin (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(machines::list_machines))
        .route("/{id}", get(machines::get_machine))
        .route("/{id}/spin", post(machines::spin))
}
