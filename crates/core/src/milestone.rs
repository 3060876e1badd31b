//! Milestone records.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::project::Project;
use crate::types::{MilestoneId, Timestamp};

/// Milestone status. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    #[default]
    InProgress,
    Completed,
}

impl MilestoneStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MilestoneStatus::InProgress => "in_progress",
            MilestoneStatus::Completed => "completed",
        }
    }
}

impl FromStr for MilestoneStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "in_progress" => Ok(MilestoneStatus::InProgress),
            "completed" => Ok(MilestoneStatus::Completed),
            other => Err(format!("Unknown milestone status '{other}'")),
        }
    }
}

/// A stored milestone record.
///
/// `project` is a value copy of the owning project slot taken when the
/// milestone was created. It never tracks later changes and plays no part in
/// completion bookkeeping.
///
/// Field order is part of the persisted layout; append new fields only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: MilestoneId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub status: MilestoneStatus,
    pub project: Project,
}

impl Milestone {
    pub fn new(id: MilestoneId, snapshot: Project, now: Timestamp) -> Self {
        Self {
            id,
            created_at: now,
            updated_at: now,
            status: MilestoneStatus::InProgress,
            project: snapshot,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == MilestoneStatus::Completed
    }
}

/// Keyed store of milestone records. Removal erases the record entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MilestoneStore {
    records: BTreeMap<MilestoneId, Milestone>,
}

impl MilestoneStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: MilestoneId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn get(&self, id: MilestoneId) -> Option<&Milestone> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: MilestoneId) -> Option<&mut Milestone> {
        self.records.get_mut(&id)
    }

    pub fn insert(&mut self, milestone: Milestone) {
        self.records.insert(milestone.id, milestone);
    }

    pub fn remove(&mut self, id: MilestoneId) -> Option<Milestone> {
        self.records.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Milestone> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<Milestone> for MilestoneStore {
    fn from_iter<I: IntoIterator<Item = Milestone>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().map(|m| (m.id, m)).collect(),
        }
    }
}
