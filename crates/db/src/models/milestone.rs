//! Row model for the `milestones` table.

use sqlx::types::Json;
use sqlx::FromRow;
use tracker_core::milestone::{Milestone, MilestoneStatus};
use tracker_core::project::Project;
use tracker_core::types::Timestamp;

use crate::{decode_error, from_db, to_db};

/// A row from the `milestones` table.
#[derive(Debug, Clone, FromRow)]
pub struct MilestoneRow {
    pub id: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub status: String,
    pub project_snapshot: Json<Project>,
}

impl MilestoneRow {
    pub fn from_record(milestone: &Milestone) -> Self {
        Self {
            id: to_db(milestone.id),
            created_at: milestone.created_at,
            updated_at: milestone.updated_at,
            status: milestone.status.as_str().to_string(),
            project_snapshot: Json(milestone.project.clone()),
        }
    }

    pub fn into_record(self) -> Result<Milestone, sqlx::Error> {
        let status = self
            .status
            .parse::<MilestoneStatus>()
            .map_err(|e| decode_error(format!("{e} for milestone {}", self.id)))?;
        Ok(Milestone {
            id: from_db(self.id),
            created_at: self.created_at,
            updated_at: self.updated_at,
            status,
            project: self.project_snapshot.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn snapshot_survives_conversion() {
        let mut milestone = Milestone::new(
            9,
            Project {
                id: 1,
                cost: 5,
                ..Project::default()
            },
            Utc::now(),
        );
        milestone.status = MilestoneStatus::Completed;

        let row = MilestoneRow::from_record(&milestone);
        assert_eq!(row.status, "completed");
        assert_eq!(row.into_record().unwrap(), milestone);
    }
}
