pub mod health;
pub mod ledger;
pub mod milestones;
pub mod projects;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ledger/initialize                  one-time role setup (POST)
/// /ledger/pause                       pause (POST)
/// /ledger/unpause                     unpause (POST)
/// /ledger/status                      initialized, paused, revision (GET)
/// /ledger/roles                       grant role (POST)
/// /ledger/roles/{role}/{identity}     has role (GET)
/// /ledger/upgrade                     swap logic revision (POST)
///
/// /projects                           create (POST)
/// /projects/{id}                      get
/// /projects/{id}/progress             completed / total
/// /projects/{id}/client               reassign client (PUT)
/// /projects/{id}/developer            reassign developer (PUT)
///
/// /milestones                         create (POST)
/// /milestones/{id}                    get, delete
/// /milestones/{id}/complete           complete (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/ledger", ledger::router())
        .nest("/projects", projects::router())
        .nest("/milestones", milestones::router())
}
