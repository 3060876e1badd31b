//! Route definitions for the `/milestones` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::milestone;
use crate::state::AppState;

/// Routes mounted at `/milestones`.
///
/// ```text
/// POST   /                 -> create
/// GET    /{id}             -> get_by_id
/// DELETE /{id}             -> delete
/// POST   /{id}/complete    -> complete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(milestone::create))
        .route("/{id}", get(milestone::get_by_id).delete(milestone::delete))
        .route("/{id}/complete", post(milestone::complete))
}
