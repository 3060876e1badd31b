//! Durable ledger state and change tracking.
//!
//! [`LedgerState`] is everything that survives a logic swap. Its layout is a
//! contract with persisted data: the field order of `LedgerState`,
//! [`Project`](crate::project::Project) and
//! [`Milestone`](crate::milestone::Milestone) is fixed and new fields are
//! appended only. `tests/storage_layout.rs` pins the order.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::access::AuthorizationRegistry;
use crate::milestone::{Milestone, MilestoneStore};
use crate::pause::PauseGate;
use crate::project::{Project, ProjectStore};
use crate::revision::LogicRevision;
use crate::types::{MilestoneId, ProjectId};

/// Initializer version written by `Ledger::initialize`.
pub const INITIALIZER_VERSION: u8 = 1;

/// Field names of [`LedgerState`] in persisted order.
pub const LEDGER_STATE_LAYOUT: &[&str] = &[
    "initialized_version",
    "roles",
    "pause",
    "projects",
    "milestones",
    "revision",
];

/// Field names of [`Project`](crate::project::Project) in persisted order.
pub const PROJECT_LAYOUT: &[&str] = &[
    "id",
    "deadline",
    "created_at",
    "updated_at",
    "completed_at",
    "client_id",
    "developer_id",
    "total_tasks",
    "total_tasks_completed",
    "status",
    "cost",
];

/// Field names of [`Milestone`](crate::milestone::Milestone) in persisted order.
pub const MILESTONE_LAYOUT: &[&str] = &["id", "created_at", "updated_at", "status", "project"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    /// Zero until `initialize` runs.
    pub initialized_version: u8,
    pub roles: AuthorizationRegistry,
    pub pause: PauseGate,
    pub projects: ProjectStore,
    pub milestones: MilestoneStore,
    pub revision: LogicRevision,
}

impl LedgerState {
    /// Fresh, uninitialized state running the given logic revision.
    pub fn new(revision: LogicRevision) -> Self {
        Self {
            revision,
            ..Self::default()
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized_version >= INITIALIZER_VERSION
    }
}

/// Keys touched by successful mutations since the last drain.
///
/// A milestone id whose record is absent from the state means the record
/// was deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub projects: BTreeSet<ProjectId>,
    pub milestones: BTreeSet<MilestoneId>,
    pub roles: bool,
    /// Initializer version, pause flag or logic revision.
    pub meta: bool,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.milestones.is_empty() && !self.roles && !self.meta
    }
}

/// Values the keys of a [`ChangeSet`] held before they were first touched.
///
/// Reverting writes those values back (`None` removes the key), which undoes
/// every pending mutation without copying untouched records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoLog {
    pub(crate) projects: BTreeMap<ProjectId, Option<Project>>,
    pub(crate) milestones: BTreeMap<MilestoneId, Option<Milestone>>,
    pub(crate) roles: Option<AuthorizationRegistry>,
    pub(crate) meta: Option<MetaSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MetaSnapshot {
    pub(crate) initialized_version: u8,
    pub(crate) pause: PauseGate,
    pub(crate) revision: LogicRevision,
}

impl MetaSnapshot {
    pub(crate) fn of(state: &LedgerState) -> Self {
        Self {
            initialized_version: state.initialized_version,
            pause: state.pause,
            revision: state.revision,
        }
    }
}

impl UndoLog {
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
            && self.milestones.is_empty()
            && self.roles.is_none()
            && self.meta.is_none()
    }

    /// Write every recorded prior value back into `state`.
    pub fn revert(self, state: &mut LedgerState) {
        for (slot, prior) in self.projects {
            match prior {
                Some(record) => state.projects.insert(slot, record),
                None => {
                    state.projects.remove(slot);
                }
            }
        }
        for (id, prior) in self.milestones {
            match prior {
                Some(milestone) => state.milestones.insert(milestone),
                None => {
                    state.milestones.remove(id);
                }
            }
        }
        if let Some(roles) = self.roles {
            state.roles = roles;
        }
        if let Some(meta) = self.meta {
            state.initialized_version = meta.initialized_version;
            state.pause = meta.pause;
            state.revision = meta.revision;
        }
    }
}
