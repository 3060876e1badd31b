//! Repository for the append-only `ledger_events` log.

use sqlx::PgPool;
use tracker_core::types::Identity;

use crate::models::ledger_event::LedgerEventRow;
use crate::to_db;

const COLUMNS: &str =
    "id, event_type, source_entity_type, source_entity_id, actor, payload, created_at";

pub struct LedgerEventRepo;

impl LedgerEventRepo {
    /// Insert a new event row, returning the generated ID.
    pub async fn insert(
        pool: &PgPool,
        event_type: &str,
        source_entity_type: Option<&str>,
        source_entity_id: Option<u64>,
        actor: Option<Identity>,
        payload: &serde_json::Value,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO ledger_events \
                (event_type, source_entity_type, source_entity_id, actor, payload) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(event_type)
        .bind(source_entity_type)
        .bind(source_entity_id.map(to_db))
        .bind(actor.map(to_db))
        .bind(payload)
        .fetch_one(pool)
        .await
    }

    /// List recent events ordered newest-first.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LedgerEventRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ledger_events ORDER BY id DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, LedgerEventRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Events recorded for one source entity, oldest first.
    pub async fn list_for_source(
        pool: &PgPool,
        source_entity_type: &str,
        source_entity_id: u64,
    ) -> Result<Vec<LedgerEventRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ledger_events \
             WHERE source_entity_type = $1 AND source_entity_id = $2 \
             ORDER BY id"
        );
        sqlx::query_as::<_, LedgerEventRow>(&query)
            .bind(source_entity_type)
            .bind(to_db(source_entity_id))
            .fetch_all(pool)
            .await
    }
}
