//! Repository for the `projects` table.

use sqlx::{PgConnection, PgPool};
use tracker_core::project::Project;
use tracker_core::types::ProjectId;

use crate::models::project::ProjectRow;
use crate::to_db;

/// Column list in record layout order.
const COLUMNS: &str = "slot_id, id, deadline, created_at, updated_at, completed_at, \
    client_id, developer_id, total_tasks, total_tasks_completed, status, cost";

pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert or overwrite the record stored in `slot`.
    pub async fn upsert(
        conn: &mut PgConnection,
        slot: ProjectId,
        project: &Project,
    ) -> Result<(), sqlx::Error> {
        let row = ProjectRow::from_record(slot, project);
        let query = format!(
            "INSERT INTO projects ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             ON CONFLICT (slot_id) DO UPDATE SET \
                id = EXCLUDED.id, \
                deadline = EXCLUDED.deadline, \
                created_at = EXCLUDED.created_at, \
                updated_at = EXCLUDED.updated_at, \
                completed_at = EXCLUDED.completed_at, \
                client_id = EXCLUDED.client_id, \
                developer_id = EXCLUDED.developer_id, \
                total_tasks = EXCLUDED.total_tasks, \
                total_tasks_completed = EXCLUDED.total_tasks_completed, \
                status = EXCLUDED.status, \
                cost = EXCLUDED.cost"
        );
        sqlx::query(&query)
            .bind(row.slot_id)
            .bind(row.id)
            .bind(row.deadline)
            .bind(row.created_at)
            .bind(row.updated_at)
            .bind(row.completed_at)
            .bind(row.client_id)
            .bind(row.developer_id)
            .bind(row.total_tasks)
            .bind(row.total_tasks_completed)
            .bind(&row.status)
            .bind(row.cost)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn find_by_slot(
        pool: &PgPool,
        slot: ProjectId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE slot_id = $1");
        let row = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(to_db(slot))
            .fetch_optional(pool)
            .await?;
        row.map(|r| r.into_record().map(|(_, project)| project))
            .transpose()
    }

    /// Every slot, ordered by slot id.
    pub async fn list(pool: &PgPool) -> Result<Vec<(ProjectId, Project)>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY slot_id");
        sqlx::query_as::<_, ProjectRow>(&query)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(ProjectRow::into_record)
            .collect()
    }
}
