//! Swappable logic revisions applied to unchanged durable state.

use serde::{Deserialize, Serialize};

use crate::lifecycle::CompletionEffect;

/// A numbered behaviour configuration. Upgrades only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicRevision {
    pub number: u32,
    pub completion: CompletionEffect,
}

impl LogicRevision {
    /// First revision: completing a milestone leaves projects untouched.
    pub const MILESTONE_ONLY: LogicRevision = LogicRevision {
        number: 1,
        completion: CompletionEffect::MilestoneOnly,
    };

    /// Current revision: completion drives project progress.
    pub const PROGRESS_LINKED: LogicRevision = LogicRevision {
        number: 2,
        completion: CompletionEffect::UpdateProject,
    };

    pub const LATEST: LogicRevision = LogicRevision::PROGRESS_LINKED;

    /// Look up a known revision by number.
    pub fn by_number(number: u32) -> Option<Self> {
        [Self::MILESTONE_ONLY, Self::PROGRESS_LINKED]
            .into_iter()
            .find(|revision| revision.number == number)
    }
}

impl Default for LogicRevision {
    fn default() -> Self {
        Self::LATEST
    }
}
