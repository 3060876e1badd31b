//! The ledger's public operation surface.
//!
//! Every mutating operation runs the same sequence: role guard, every
//! precondition, mutation, change tracking, then notification emission. A
//! failure before the mutation step returns without touching state and
//! without emitting anything.
//!
//! The pause flag is toggled here but no project or milestone operation
//! checks it.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::clock::Clock;
use crate::error::CoreError;
use crate::lifecycle::LifecycleCoordinator;
use crate::milestone::{Milestone, MilestoneStatus};
use crate::notification::{Notification, NotificationSink};
use crate::project::{validate_deadline, validate_new_project, NewProject, Project};
use crate::revision::LogicRevision;
use crate::roles::Role;
use crate::state::{ChangeSet, LedgerState, MetaSnapshot, UndoLog, INITIALIZER_VERSION};
use crate::types::{Identity, MilestoneId, ProjectId, Timestamp};

pub struct Ledger {
    state: LedgerState,
    changes: ChangeSet,
    undo: UndoLog,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn NotificationSink>,
}

impl Ledger {
    /// A fresh, uninitialized ledger running the latest logic revision.
    ///
    /// No roles are granted here; call [`initialize`](Self::initialize).
    pub fn new(clock: Arc<dyn Clock>, sink: Arc<dyn NotificationSink>) -> Self {
        Self::with_state(LedgerState::new(LogicRevision::LATEST), clock, sink)
    }

    /// Attach logic to previously persisted state.
    pub fn with_state(
        state: LedgerState,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            state,
            changes: ChangeSet::default(),
            undo: UndoLog::default(),
            clock,
            sink,
        }
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Replace the durable state wholesale and forget pending changes.
    pub fn restore(&mut self, state: LedgerState) {
        self.state = state;
        self.changes = ChangeSet::default();
        self.undo = UndoLog::default();
    }

    /// Keys touched since the last commit or rollback.
    pub fn pending_changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// Accept every pending mutation and drain the keys it touched.
    pub fn take_changes(&mut self) -> ChangeSet {
        self.undo = UndoLog::default();
        std::mem::take(&mut self.changes)
    }

    /// Undo every pending mutation, restoring the touched keys to the values
    /// they held at the last commit.
    pub fn rollback(&mut self) {
        std::mem::take(&mut self.undo).revert(&mut self.state);
        self.changes = ChangeSet::default();
    }

    // Each `touch_*` records the key's prior value the first time it is
    // touched, so it must run before the mutation.

    fn touch_project(&mut self, slot: ProjectId) {
        if self.changes.projects.insert(slot) {
            let prior = self.state.projects.get(slot).cloned();
            self.undo.projects.entry(slot).or_insert(prior);
        }
    }

    fn touch_milestone(&mut self, milestone_id: MilestoneId) {
        if self.changes.milestones.insert(milestone_id) {
            let prior = self.state.milestones.get(milestone_id).cloned();
            self.undo.milestones.entry(milestone_id).or_insert(prior);
        }
    }

    fn touch_roles(&mut self) {
        if !self.changes.roles {
            self.changes.roles = true;
            self.undo.roles = Some(self.state.roles.clone());
        }
    }

    fn touch_meta(&mut self) {
        if !self.changes.meta {
            self.changes.meta = true;
            self.undo.meta = Some(MetaSnapshot::of(&self.state));
        }
    }

    fn emit(&self, notifications: &[Notification]) {
        for notification in notifications {
            self.sink.emit(notification);
        }
    }

    // -----------------------------------------------------------------------
    // Initialization & roles
    // -----------------------------------------------------------------------

    /// One-time setup: grants every role to `caller`.
    pub fn initialize(&mut self, caller: Identity) -> Result<(), CoreError> {
        if self.state.is_initialized() {
            return Err(CoreError::InvalidState(
                "ledger is already initialized".into(),
            ));
        }

        self.touch_roles();
        self.touch_meta();

        let mut notifications = Vec::new();
        for role in Role::ALL {
            if self.state.roles.grant(role, caller) {
                notifications.push(Notification::RoleGranted {
                    role,
                    account: caller,
                    sender: caller,
                });
            }
        }
        self.state.initialized_version = INITIALIZER_VERSION;

        tracing::info!(caller, version = INITIALIZER_VERSION, "Ledger initialized");
        self.emit(&notifications);
        Ok(())
    }

    /// Grant `role` to `account`. Returns `false` if it was already held.
    pub fn grant_role(
        &mut self,
        caller: Identity,
        role: Role,
        account: Identity,
    ) -> Result<bool, CoreError> {
        self.state.roles.require_role(Role::SuperAdmin, caller)?;

        if self.state.roles.has_role(role, account) {
            return Ok(false);
        }
        self.touch_roles();
        self.state.roles.grant(role, account);

        tracing::info!(%role, account, caller, "Role granted");
        self.emit(&[Notification::RoleGranted {
            role,
            account,
            sender: caller,
        }]);
        Ok(true)
    }

    pub fn has_role(&self, role: Role, identity: Identity) -> bool {
        self.state.roles.has_role(role, identity)
    }

    // -----------------------------------------------------------------------
    // Pause gate
    // -----------------------------------------------------------------------

    pub fn pause(&mut self, caller: Identity) -> Result<(), CoreError> {
        self.state.roles.require_role(Role::Pauser, caller)?;
        let mut gate = self.state.pause;
        gate.pause()?;
        self.touch_meta();
        self.state.pause = gate;

        tracing::info!(caller, "Ledger paused");
        self.emit(&[Notification::Paused { account: caller }]);
        Ok(())
    }

    pub fn unpause(&mut self, caller: Identity) -> Result<(), CoreError> {
        self.state.roles.require_role(Role::Pauser, caller)?;
        let mut gate = self.state.pause;
        gate.unpause()?;
        self.touch_meta();
        self.state.pause = gate;

        tracing::info!(caller, "Ledger unpaused");
        self.emit(&[Notification::Unpaused { account: caller }]);
        Ok(())
    }

    pub fn is_paused(&self) -> bool {
        self.state.pause.is_paused()
    }

    // -----------------------------------------------------------------------
    // Logic revision
    // -----------------------------------------------------------------------

    pub fn revision(&self) -> LogicRevision {
        self.state.revision
    }

    /// Swap the active logic. Records are left exactly as they are.
    pub fn upgrade_logic(
        &mut self,
        caller: Identity,
        revision: LogicRevision,
    ) -> Result<(), CoreError> {
        self.state.roles.require_role(Role::SuperAdmin, caller)?;

        let current = self.state.revision;
        if revision.number <= current.number {
            return Err(CoreError::InvalidArgument(format!(
                "logic revision {} must be newer than the active revision {}",
                revision.number, current.number
            )));
        }

        self.touch_meta();
        self.state.revision = revision;

        tracing::info!(
            caller,
            from = current.number,
            to = revision.number,
            completion = revision.completion.as_str(),
            "Logic revision upgraded"
        );
        self.emit(&[Notification::Upgraded {
            revision: revision.number,
        }]);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    /// Create a project together with its milestones.
    ///
    /// Milestones are created before the project record is written, so their
    /// snapshots hold whatever the slot contained beforehand (normally the
    /// default record).
    pub fn create_project(
        &mut self,
        caller: Identity,
        input: NewProject,
    ) -> Result<Project, CoreError> {
        self.state.roles.require_role(Role::Admin, caller)?;

        let now = self.clock.now();
        validate_deadline(input.deadline, now)?;
        if self.state.projects.exists(input.id) {
            return Err(CoreError::AlreadyExists {
                entity: "Project",
                id: input.id,
            });
        }
        validate_new_project(&input)?;

        let mut pending = BTreeSet::new();
        for &milestone_id in &input.milestone_ids {
            self.check_new_milestone(milestone_id)?;
            if !pending.insert(milestone_id) {
                return Err(CoreError::AlreadyExists {
                    entity: "Milestone",
                    id: milestone_id,
                });
            }
        }

        let project_id = input.id;
        let mut notifications = Vec::with_capacity(input.milestone_ids.len() + 1);
        for &milestone_id in &input.milestone_ids {
            let milestone = self.insert_milestone(milestone_id, project_id, now);
            notifications.push(Self::milestone_created(&milestone));
        }

        let project = input.into_record(now);
        self.touch_project(project_id);
        self.state.projects.insert(project_id, project.clone());

        tracing::info!(
            project_id,
            caller,
            total_tasks = project.total_tasks,
            milestones = notifications.len(),
            "Project created"
        );
        notifications.push(Notification::ProjectCreated {
            project: project.clone(),
        });
        self.emit(&notifications);
        Ok(project)
    }

    /// Overwrite a project's client. The slot is not checked for existence.
    pub fn update_project_client(
        &mut self,
        caller: Identity,
        project_id: ProjectId,
        new_client_id: Identity,
    ) -> Result<(), CoreError> {
        self.state.roles.require_role(Role::Admin, caller)?;

        self.touch_project(project_id);
        let project = self.state.projects.slot_mut(project_id);
        let previous = project.client_id;
        project.client_id = new_client_id;

        tracing::info!(project_id, previous, new = new_client_id, "Project client changed");
        self.emit(&[Notification::ProjectClientChanged {
            previous,
            new: new_client_id,
            project_id,
        }]);
        Ok(())
    }

    /// Overwrite a project's developer. The slot is not checked for existence.
    pub fn update_project_developer(
        &mut self,
        caller: Identity,
        project_id: ProjectId,
        new_developer_id: Identity,
    ) -> Result<(), CoreError> {
        self.state.roles.require_role(Role::Admin, caller)?;

        self.touch_project(project_id);
        let project = self.state.projects.slot_mut(project_id);
        let previous = project.developer_id;
        project.developer_id = new_developer_id;

        tracing::info!(
            project_id,
            previous,
            new = new_developer_id,
            "Project developer changed"
        );
        self.emit(&[Notification::ProjectDeveloperChanged {
            previous,
            new: new_developer_id,
            project_id,
        }]);
        Ok(())
    }

    /// `(completed, total)`; zeros for an unknown project.
    pub fn project_progress(&self, project_id: ProjectId) -> (u64, u64) {
        self.state.projects.progress(project_id)
    }

    pub fn project(&self, project_id: ProjectId) -> Option<&Project> {
        self.state.projects.get(project_id)
    }

    // -----------------------------------------------------------------------
    // Milestones
    // -----------------------------------------------------------------------

    pub fn create_milestone(
        &mut self,
        caller: Identity,
        milestone_id: MilestoneId,
        project_id: ProjectId,
    ) -> Result<Milestone, CoreError> {
        self.state.roles.require_role(Role::Admin, caller)?;
        if self.state.milestones.contains(milestone_id) {
            return Err(CoreError::AlreadyExists {
                entity: "Milestone",
                id: milestone_id,
            });
        }
        self.check_new_milestone(milestone_id)?;

        let now = self.clock.now();
        let milestone = self.insert_milestone(milestone_id, project_id, now);

        tracing::info!(milestone_id, project_id, caller, "Milestone created");
        self.emit(&[Self::milestone_created(&milestone)]);
        Ok(milestone)
    }

    /// Mark a milestone completed and apply the active completion effect to
    /// `project_id`.
    ///
    /// The caller-supplied `project_id` is authoritative; the milestone's
    /// stored snapshot is not consulted.
    pub fn complete_milestone(
        &mut self,
        caller: Identity,
        milestone_id: MilestoneId,
        project_id: ProjectId,
    ) -> Result<Milestone, CoreError> {
        self.state.roles.require_role(Role::Admin, caller)?;

        let now = self.clock.now();
        let effect = self.state.revision.completion;
        let already_completed = self
            .state
            .milestones
            .get(milestone_id)
            .ok_or(CoreError::NotFound {
                entity: "Milestone",
                id: milestone_id,
            })?
            .is_completed();
        if already_completed {
            return Err(CoreError::InvalidState(format!(
                "milestone {milestone_id} is already completed"
            )));
        }

        self.touch_milestone(milestone_id);
        let milestone = self
            .state
            .milestones
            .get_mut(milestone_id)
            .ok_or(CoreError::NotFound {
                entity: "Milestone",
                id: milestone_id,
            })?;
        milestone.status = MilestoneStatus::Completed;
        milestone.updated_at = now;
        let completed = milestone.clone();

        if effect.updates_project() {
            self.touch_project(project_id);
        }
        LifecycleCoordinator::apply_completion(effect, &mut self.state.projects, project_id, now);

        tracing::info!(
            milestone_id,
            project_id,
            caller,
            effect = effect.as_str(),
            "Milestone completed"
        );
        self.emit(&[Notification::MilestoneCompleted {
            id: milestone_id,
            updated_at: completed.updated_at,
            status: completed.status,
        }]);
        Ok(completed)
    }

    /// Erase a milestone. Its id becomes free for reuse.
    pub fn delete_milestone(
        &mut self,
        caller: Identity,
        milestone_id: MilestoneId,
    ) -> Result<(), CoreError> {
        self.state.roles.require_role(Role::Admin, caller)?;
        if !self.state.milestones.contains(milestone_id) {
            return Err(CoreError::NotFound {
                entity: "Milestone",
                id: milestone_id,
            });
        }
        self.touch_milestone(milestone_id);
        self.state.milestones.remove(milestone_id);

        tracing::info!(milestone_id, caller, "Milestone deleted");
        self.emit(&[Notification::MilestoneDeleted { id: milestone_id }]);
        Ok(())
    }

    pub fn milestone(&self, milestone_id: MilestoneId) -> Option<&Milestone> {
        self.state.milestones.get(milestone_id)
    }

    // -----------------------------------------------------------------------
    // Shared milestone creation routine
    // -----------------------------------------------------------------------

    fn check_new_milestone(&self, milestone_id: MilestoneId) -> Result<(), CoreError> {
        if milestone_id == 0 {
            return Err(CoreError::InvalidArgument(
                "milestone id must be nonzero".into(),
            ));
        }
        if self.state.milestones.contains(milestone_id) {
            return Err(CoreError::AlreadyExists {
                entity: "Milestone",
                id: milestone_id,
            });
        }
        Ok(())
    }

    /// Write a milestone whose id has already passed `check_new_milestone`.
    fn insert_milestone(
        &mut self,
        milestone_id: MilestoneId,
        project_id: ProjectId,
        now: Timestamp,
    ) -> Milestone {
        let snapshot = self.state.projects.snapshot(project_id);
        let milestone = Milestone::new(milestone_id, snapshot, now);
        self.touch_milestone(milestone_id);
        self.state.milestones.insert(milestone.clone());
        milestone
    }

    fn milestone_created(milestone: &Milestone) -> Notification {
        Notification::MilestoneCreated {
            id: milestone.id,
            project: milestone.project.clone(),
            created_at: milestone.created_at,
        }
    }
}
