//! Repository for the `milestones` table.

use sqlx::{PgConnection, PgPool};
use tracker_core::milestone::Milestone;
use tracker_core::types::MilestoneId;

use crate::models::milestone::MilestoneRow;
use crate::to_db;

const COLUMNS: &str = "id, created_at, updated_at, status, project_snapshot";

pub struct MilestoneRepo;

impl MilestoneRepo {
    pub async fn upsert(conn: &mut PgConnection, milestone: &Milestone) -> Result<(), sqlx::Error> {
        let row = MilestoneRow::from_record(milestone);
        let query = format!(
            "INSERT INTO milestones ({COLUMNS}) VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE SET \
                created_at = EXCLUDED.created_at, \
                updated_at = EXCLUDED.updated_at, \
                status = EXCLUDED.status, \
                project_snapshot = EXCLUDED.project_snapshot"
        );
        sqlx::query(&query)
            .bind(row.id)
            .bind(row.created_at)
            .bind(row.updated_at)
            .bind(&row.status)
            .bind(&row.project_snapshot)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Delete a milestone. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: MilestoneId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM milestones WHERE id = $1")
            .bind(to_db(id))
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: MilestoneId,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM milestones WHERE id = $1");
        sqlx::query_as::<_, MilestoneRow>(&query)
            .bind(to_db(id))
            .fetch_optional(pool)
            .await?
            .map(MilestoneRow::into_record)
            .transpose()
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Milestone>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM milestones ORDER BY id");
        sqlx::query_as::<_, MilestoneRow>(&query)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(MilestoneRow::into_record)
            .collect()
    }
}
