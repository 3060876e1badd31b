//! Row model for the `projects` table.

use sqlx::FromRow;
use tracker_core::project::{Project, ProjectStatus};
use tracker_core::types::{ProjectId, Timestamp};

use crate::{decode_error, from_db, to_db};

/// A row from the `projects` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ProjectRow {
    pub slot_id: i64,
    pub id: i64,
    pub deadline: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub completed_at: Timestamp,
    pub client_id: i64,
    pub developer_id: i64,
    pub total_tasks: i64,
    pub total_tasks_completed: i64,
    pub status: String,
    pub cost: i64,
}

impl ProjectRow {
    pub fn from_record(slot: ProjectId, project: &Project) -> Self {
        Self {
            slot_id: to_db(slot),
            id: to_db(project.id),
            deadline: project.deadline,
            created_at: project.created_at,
            updated_at: project.updated_at,
            completed_at: project.completed_at,
            client_id: to_db(project.client_id),
            developer_id: to_db(project.developer_id),
            total_tasks: to_db(project.total_tasks),
            total_tasks_completed: to_db(project.total_tasks_completed),
            status: project.status.as_str().to_string(),
            cost: to_db(project.cost),
        }
    }

    /// Convert back into `(slot, record)`.
    pub fn into_record(self) -> Result<(ProjectId, Project), sqlx::Error> {
        let status = self
            .status
            .parse::<ProjectStatus>()
            .map_err(|e| decode_error(format!("{e} in slot {}", self.slot_id)))?;
        Ok((
            from_db(self.slot_id),
            Project {
                id: from_db(self.id),
                deadline: self.deadline,
                created_at: self.created_at,
                updated_at: self.updated_at,
                completed_at: self.completed_at,
                client_id: from_db(self.client_id),
                developer_id: from_db(self.developer_id),
                total_tasks: from_db(self.total_tasks),
                total_tasks_completed: from_db(self.total_tasks_completed),
                status,
                cost: from_db(self.cost),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn record_converts_back_unchanged() {
        let project = Project {
            id: 3,
            deadline: Utc::now(),
            total_tasks: 4,
            total_tasks_completed: u64::MAX,
            status: ProjectStatus::Completed,
            cost: 12,
            ..Project::default()
        };
        let row = ProjectRow::from_record(3, &project);
        assert_eq!(row.status, "completed");
        assert_eq!(row.into_record().unwrap(), (3, project));
    }

    #[test]
    fn unknown_status_is_a_decode_error() {
        let mut row = ProjectRow::from_record(1, &Project::default());
        row.status = "archived".into();
        assert!(matches!(row.into_record(), Err(sqlx::Error::Decode(_))));
    }
}
