//! Route definitions for the `/projects` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// POST   /                  -> create
/// GET    /{id}              -> get_by_id
/// GET    /{id}/progress     -> progress
/// PUT    /{id}/client       -> update_client
/// PUT    /{id}/developer    -> update_developer
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(project::create))
        .route("/{id}", get(project::get_by_id))
        .route("/{id}/progress", get(project::progress))
        .route("/{id}/client", put(project::update_client))
        .route("/{id}/developer", put(project::update_developer))
}
