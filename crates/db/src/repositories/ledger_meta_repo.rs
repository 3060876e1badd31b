//! Repository for the singleton `ledger_meta` row.

use sqlx::{PgConnection, PgPool};
use tracker_core::state::LedgerState;

use crate::models::ledger_meta::LedgerMetaRow;

pub struct LedgerMetaRepo;

impl LedgerMetaRepo {
    pub async fn get(pool: &PgPool) -> Result<Option<LedgerMetaRow>, sqlx::Error> {
        sqlx::query_as::<_, LedgerMetaRow>(
            "SELECT initialized_version, revision_number, completion_effect, paused \
             FROM ledger_meta WHERE id = 1",
        )
        .fetch_optional(pool)
        .await
    }

    /// Write the meta fields of `state`, creating the row on first use.
    pub async fn save(conn: &mut PgConnection, state: &LedgerState) -> Result<(), sqlx::Error> {
        let row = LedgerMetaRow::from_state(state)?;
        sqlx::query(
            "INSERT INTO ledger_meta (id, initialized_version, revision_number, completion_effect, paused) \
             VALUES (1, $1, $2, $3, $4) \
             ON CONFLICT (id) DO UPDATE SET \
                initialized_version = EXCLUDED.initialized_version, \
                revision_number = EXCLUDED.revision_number, \
                completion_effect = EXCLUDED.completion_effect, \
                paused = EXCLUDED.paused, \
                updated_at = NOW()",
        )
        .bind(row.initialized_version)
        .bind(row.revision_number)
        .bind(&row.completion_effect)
        .bind(row.paused)
        .execute(conn)
        .await?;
        Ok(())
    }
}
