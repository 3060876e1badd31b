//! Structured change notifications for external observers.
//!
//! Nothing inside the ledger reads a notification back; they exist purely
//! for consumers such as the event bus and the durable event log.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::milestone::MilestoneStatus;
use crate::project::Project;
use crate::roles::Role;
use crate::types::{Identity, MilestoneId, ProjectId, Timestamp};

/// A single state-change emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    ProjectCreated {
        project: Project,
    },
    MilestoneCreated {
        id: MilestoneId,
        project: Project,
        created_at: Timestamp,
    },
    MilestoneCompleted {
        id: MilestoneId,
        updated_at: Timestamp,
        status: MilestoneStatus,
    },
    MilestoneDeleted {
        id: MilestoneId,
    },
    ProjectClientChanged {
        previous: Identity,
        new: Identity,
        project_id: ProjectId,
    },
    ProjectDeveloperChanged {
        previous: Identity,
        new: Identity,
        project_id: ProjectId,
    },
    RoleGranted {
        role: Role,
        account: Identity,
        sender: Identity,
    },
    Paused {
        account: Identity,
    },
    Unpaused {
        account: Identity,
    },
    Upgraded {
        revision: u32,
    },
}

impl Notification {
    /// Dot-separated event name used by the event bus and the event log.
    pub fn event_type(&self) -> &'static str {
        match self {
            Notification::ProjectCreated { .. } => "project.created",
            Notification::MilestoneCreated { .. } => "milestone.created",
            Notification::MilestoneCompleted { .. } => "milestone.completed",
            Notification::MilestoneDeleted { .. } => "milestone.deleted",
            Notification::ProjectClientChanged { .. } => "project.client_changed",
            Notification::ProjectDeveloperChanged { .. } => "project.developer_changed",
            Notification::RoleGranted { .. } => "ledger.role_granted",
            Notification::Paused { .. } => "ledger.paused",
            Notification::Unpaused { .. } => "ledger.unpaused",
            Notification::Upgraded { .. } => "ledger.upgraded",
        }
    }

    /// The entity kind and id the notification is about, if any.
    pub fn source(&self) -> Option<(&'static str, u64)> {
        match self {
            Notification::ProjectCreated { project } => Some(("project", project.id)),
            Notification::MilestoneCreated { id, .. }
            | Notification::MilestoneCompleted { id, .. }
            | Notification::MilestoneDeleted { id } => Some(("milestone", *id)),
            Notification::ProjectClientChanged { project_id, .. }
            | Notification::ProjectDeveloperChanged { project_id, .. } => {
                Some(("project", *project_id))
            }
            Notification::RoleGranted { .. }
            | Notification::Paused { .. }
            | Notification::Unpaused { .. }
            | Notification::Upgraded { .. } => None,
        }
    }
}

/// Receiver of ledger notifications. Emission is append-only.
pub trait NotificationSink: Send + Sync {
    fn emit(&self, notification: &Notification);
}

/// In-memory append-only notification log.
///
/// Also serves as a staging outbox: callers that must delay publication
/// until a write-through succeeds [`drain`](Self::drain) it afterwards.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every notification recorded so far.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for NotificationLog {
    fn emit(&self, notification: &Notification) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_appends_in_order_and_drains() {
        let log = NotificationLog::new();
        log.emit(&Notification::MilestoneDeleted { id: 1 });
        log.emit(&Notification::MilestoneDeleted { id: 2 });

        assert_eq!(log.len(), 2);
        assert_eq!(
            log.snapshot(),
            vec![
                Notification::MilestoneDeleted { id: 1 },
                Notification::MilestoneDeleted { id: 2 },
            ]
        );

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn serialized_form_is_tagged_by_kind() {
        let json = serde_json::to_value(Notification::ProjectClientChanged {
            previous: 4,
            new: 99,
            project_id: 1,
        })
        .unwrap();
        assert_eq!(json["kind"], "project_client_changed");
        assert_eq!(json["previous"], 4);
        assert_eq!(json["new"], 99);
        assert_eq!(json["project_id"], 1);
    }

    #[test]
    fn source_points_at_the_affected_entity() {
        assert_eq!(
            Notification::MilestoneDeleted { id: 20 }.source(),
            Some(("milestone", 20))
        );
        assert_eq!(Notification::Upgraded { revision: 2 }.source(), None);
        assert_eq!(
            Notification::Paused { account: 1 }.event_type(),
            "ledger.paused"
        );
    }
}
