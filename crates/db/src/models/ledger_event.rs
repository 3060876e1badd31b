//! Row model for the `ledger_events` table.

use serde::Serialize;
use sqlx::FromRow;
use tracker_core::types::Timestamp;

/// A persisted notification.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LedgerEventRow {
    pub id: i64,
    pub event_type: String,
    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<i64>,
    pub actor: Option<i64>,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}
