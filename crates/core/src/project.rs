//! Project records and creation-time validation.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Identity, MilestoneId, ProjectId, Timestamp, ZERO_TIMESTAMP};

/// Lifecycle status of a project.
///
/// `Cancelled` is a valid stored value but no operation transitions to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    InProgress,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "in_progress" => Ok(ProjectStatus::InProgress),
            "completed" => Ok(ProjectStatus::Completed),
            "cancelled" => Ok(ProjectStatus::Cancelled),
            other => Err(format!("Unknown project status '{other}'")),
        }
    }
}

/// A stored project record.
///
/// Field order is part of the persisted layout; append new fields only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub deadline: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub completed_at: Timestamp,
    pub client_id: Identity,
    pub developer_id: Identity,
    pub total_tasks: u64,
    pub total_tasks_completed: u64,
    pub status: ProjectStatus,
    pub cost: u64,
}

impl Default for Project {
    /// The zero-valued record an unwritten project slot reads as.
    fn default() -> Self {
        Self {
            id: 0,
            deadline: ZERO_TIMESTAMP,
            created_at: ZERO_TIMESTAMP,
            updated_at: ZERO_TIMESTAMP,
            completed_at: ZERO_TIMESTAMP,
            client_id: 0,
            developer_id: 0,
            total_tasks: 0,
            total_tasks_completed: 0,
            status: ProjectStatus::InProgress,
            cost: 0,
        }
    }
}

impl Project {
    /// A slot counts as a written project only once `create_project` has
    /// stored a nonzero id in it. Field updates on unknown slots leave the id
    /// at zero.
    pub fn is_written(&self) -> bool {
        self.id != 0
    }

    /// `(completed, total)` task counters.
    pub fn progress(&self) -> (u64, u64) {
        (self.total_tasks_completed, self.total_tasks)
    }
}

/// Input for `create_project`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub id: ProjectId,
    pub deadline: Timestamp,
    pub updated_at: Timestamp,
    pub completed_at: Timestamp,
    pub total_tasks: u64,
    pub client_id: Identity,
    pub developer_id: Identity,
    pub cost: u64,
    /// Milestones created alongside the project, in this order.
    #[serde(default)]
    pub milestone_ids: Vec<MilestoneId>,
}

impl NewProject {
    /// Build the record written once every cascaded milestone exists.
    pub fn into_record(self, now: Timestamp) -> Project {
        Project {
            id: self.id,
            deadline: self.deadline,
            created_at: now,
            updated_at: self.updated_at,
            completed_at: self.completed_at,
            client_id: self.client_id,
            developer_id: self.developer_id,
            total_tasks: self.total_tasks,
            total_tasks_completed: 0,
            status: ProjectStatus::InProgress,
            cost: self.cost,
        }
    }
}

/// Reject a deadline that is not strictly in the future.
pub fn validate_deadline(deadline: Timestamp, now: Timestamp) -> Result<(), CoreError> {
    if deadline > now {
        Ok(())
    } else {
        Err(CoreError::InvalidArgument(format!(
            "deadline {deadline} must be after the current time {now}"
        )))
    }
}

/// Reject zero ids, zero task counts and zero cost.
pub fn validate_new_project(input: &NewProject) -> Result<(), CoreError> {
    if input.id == 0 {
        return Err(CoreError::InvalidArgument(
            "project id must be nonzero".to_string(),
        ));
    }
    if input.total_tasks == 0 {
        return Err(CoreError::InvalidArgument(
            "total_tasks must be greater than zero".to_string(),
        ));
    }
    if input.cost == 0 {
        return Err(CoreError::InvalidArgument(
            "cost must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Keyed store of project slots.
///
/// Reads of an absent slot behave like reads of [`Project::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectStore {
    records: BTreeMap<ProjectId, Project>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` names a project written by `create_project`.
    pub fn exists(&self, id: ProjectId) -> bool {
        self.records.get(&id).is_some_and(Project::is_written)
    }

    /// The stored record for a slot, written or not.
    pub fn get(&self, id: ProjectId) -> Option<&Project> {
        self.records.get(&id)
    }

    /// Value copy of a slot, the default record if nothing is stored.
    pub fn snapshot(&self, id: ProjectId) -> Project {
        self.records.get(&id).cloned().unwrap_or_default()
    }

    /// Mutable access to a slot, materialising a default record if absent.
    pub fn slot_mut(&mut self, id: ProjectId) -> &mut Project {
        self.records.entry(id).or_default()
    }

    pub fn insert(&mut self, slot: ProjectId, record: Project) {
        self.records.insert(slot, record);
    }

    /// Drop a slot entirely. Only used to undo a slot's materialisation.
    pub fn remove(&mut self, slot: ProjectId) -> Option<Project> {
        self.records.remove(&slot)
    }

    pub fn progress(&self, id: ProjectId) -> (u64, u64) {
        self.records
            .get(&id)
            .map(Project::progress)
            .unwrap_or((0, 0))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProjectId, &Project)> {
        self.records.iter().map(|(slot, record)| (*slot, record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<(ProjectId, Project)> for ProjectStore {
    fn from_iter<I: IntoIterator<Item = (ProjectId, Project)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;

    fn input() -> NewProject {
        NewProject {
            id: 1,
            deadline: Utc::now() + Duration::days(30),
            updated_at: Utc::now(),
            completed_at: ZERO_TIMESTAMP,
            total_tasks: 3,
            client_id: 11,
            developer_id: 12,
            cost: 5_000,
            milestone_ids: vec![],
        }
    }

    #[test]
    fn default_record_is_unwritten() {
        let project = Project::default();
        assert!(!project.is_written());
        assert_eq!(project.progress(), (0, 0));
        assert_eq!(project.status, ProjectStatus::InProgress);
        assert_eq!(project.created_at, ZERO_TIMESTAMP);
    }

    #[test]
    fn zero_fields_are_invalid_arguments() {
        let mut zero_id = input();
        zero_id.id = 0;
        assert_matches!(validate_new_project(&zero_id), Err(CoreError::InvalidArgument(_)));

        let mut zero_tasks = input();
        zero_tasks.total_tasks = 0;
        assert_matches!(validate_new_project(&zero_tasks), Err(CoreError::InvalidArgument(_)));

        let mut zero_cost = input();
        zero_cost.cost = 0;
        assert_matches!(validate_new_project(&zero_cost), Err(CoreError::InvalidArgument(_)));

        assert!(validate_new_project(&input()).is_ok());
    }

    #[test]
    fn deadline_must_be_strictly_in_the_future() {
        let now = Utc::now();
        assert!(validate_deadline(now + Duration::seconds(1), now).is_ok());
        assert_matches!(validate_deadline(now, now), Err(CoreError::InvalidArgument(_)));
        assert_matches!(
            validate_deadline(now - Duration::seconds(1), now),
            Err(CoreError::InvalidArgument(_))
        );
    }

    #[test]
    fn record_starts_with_zero_completed_tasks() {
        let now = Utc::now();
        let source = input();
        let record = source.clone().into_record(now);
        assert_eq!(record.created_at, now);
        assert_eq!(record.updated_at, source.updated_at);
        assert_eq!(record.total_tasks_completed, 0);
        assert_eq!(record.status, ProjectStatus::InProgress);
    }

    #[test]
    fn status_strings_round_trip() {
        for status in [
            ProjectStatus::InProgress,
            ProjectStatus::Completed,
            ProjectStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<ProjectStatus>(), Ok(status));
        }
        assert!("archived".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn slot_written_by_field_update_does_not_count_as_existing() {
        let mut store = ProjectStore::new();
        store.slot_mut(5).client_id = 42;

        assert!(!store.exists(5));
        assert_eq!(store.get(5).map(|p| p.client_id), Some(42));
        assert_eq!(store.progress(5), (0, 0));
    }

    #[test]
    fn snapshot_of_absent_slot_is_default() {
        let store = ProjectStore::new();
        assert_eq!(store.snapshot(9), Project::default());
        assert_eq!(store.progress(9), (0, 0));
        assert!(store.is_empty());
    }
}
