//! Cross-entity effect of milestone completion on project state.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::project::{ProjectStatus, ProjectStore};
use crate::types::{ProjectId, Timestamp};

/// What completing a milestone does to the project named by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionEffect {
    /// Only the milestone changes.
    MilestoneOnly,
    /// Bump the project's completed counter, stamp `completed_at`, and flip
    /// the project to `Completed` when the counter reaches `total_tasks`.
    UpdateProject,
}

impl CompletionEffect {
    pub fn as_str(self) -> &'static str {
        match self {
            CompletionEffect::MilestoneOnly => "milestone_only",
            CompletionEffect::UpdateProject => "update_project",
        }
    }

    /// Whether completion writes to the project slot.
    pub fn updates_project(self) -> bool {
        matches!(self, CompletionEffect::UpdateProject)
    }
}

impl FromStr for CompletionEffect {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "milestone_only" => Ok(CompletionEffect::MilestoneOnly),
            "update_project" => Ok(CompletionEffect::UpdateProject),
            other => Err(format!("Unknown completion effect '{other}'")),
        }
    }
}

/// Applies [`CompletionEffect`]s to the project store.
pub struct LifecycleCoordinator;

impl LifecycleCoordinator {
    /// Apply one milestone completion to `project_id`.
    ///
    /// The slot is taken as given: an unknown id gets a default record. The
    /// counter wraps at `u64::MAX`. `completed_at` moves on every
    /// completion, not just the final one. Returns whether the project
    /// slot was touched.
    pub fn apply_completion(
        effect: CompletionEffect,
        projects: &mut ProjectStore,
        project_id: ProjectId,
        now: Timestamp,
    ) -> bool {
        match effect {
            CompletionEffect::MilestoneOnly => false,
            CompletionEffect::UpdateProject => {
                let project = projects.slot_mut(project_id);
                project.total_tasks_completed = project.total_tasks_completed.wrapping_add(1);
                project.completed_at = now;
                if project.total_tasks_completed == project.total_tasks {
                    project.status = ProjectStatus::Completed;
                }
                tracing::debug!(
                    project_id,
                    completed = project.total_tasks_completed,
                    total = project.total_tasks,
                    status = project.status.as_str(),
                    "Applied milestone completion to project"
                );
                true
            }
        }
    }
}
