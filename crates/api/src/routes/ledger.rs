//! Route definitions for ledger administration.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ledger;
use crate::state::AppState;

/// Routes mounted at `/ledger`.
///
/// ```text
/// POST   /initialize               -> initialize
/// POST   /pause                    -> pause
/// POST   /unpause                  -> unpause
/// GET    /status                   -> status
/// POST   /roles                    -> grant_role
/// GET    /roles/{role}/{identity}  -> has_role
/// POST   /upgrade                  -> upgrade
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/initialize", post(ledger::initialize))
        .route("/pause", post(ledger::pause))
        .route("/unpause", post(ledger::unpause))
        .route("/status", get(ledger::status))
        .route("/roles", post(ledger::grant_role))
        .route("/roles/{role}/{identity}", get(ledger::has_role))
        .route("/upgrade", post(ledger::upgrade))
}
