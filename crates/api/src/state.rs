use std::sync::Arc;

use crate::config::ServerConfig;
use crate::service::LedgerService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// The ledger and its write-through pipeline.
    pub ledger: Arc<LedgerService>,
    /// Database connection pool, absent when running in memory.
    pub pool: Option<tracker_db::DbPool>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Bus carrying every committed ledger notification.
    pub event_bus: Arc<tracker_events::EventBus>,
}
