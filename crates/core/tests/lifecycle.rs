//! End-to-end lifecycle scenarios against the public `Ledger` surface.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use tracker_core::clock::{Clock, ManualClock};
use tracker_core::error::CoreError;
use tracker_core::notification::{Notification, NotificationLog};
use tracker_core::project::{NewProject, Project, ProjectStatus};
use tracker_core::state::LedgerState;
use tracker_core::types::{Identity, ZERO_TIMESTAMP};
use tracker_core::Ledger;

const ADMIN: Identity = 1;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Harness {
    ledger: Ledger,
    log: Arc<NotificationLog>,
    clock: Arc<ManualClock>,
}

fn harness() -> Harness {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let log = Arc::new(NotificationLog::new());
    let mut ledger = Ledger::new(clock.clone(), log.clone());
    ledger.initialize(ADMIN).unwrap();
    log.drain();
    Harness { ledger, log, clock }
}

fn project_input(id: u64, total_tasks: u64, cost: u64, milestones: &[u64]) -> NewProject {
    NewProject {
        id,
        deadline: Utc::now() + Duration::days(14),
        updated_at: Utc::now(),
        completed_at: ZERO_TIMESTAMP,
        total_tasks,
        client_id: 4,
        developer_id: 5,
        cost,
        milestone_ids: milestones.to_vec(),
    }
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[test]
fn fresh_ids_succeed_and_repeats_fail() {
    let mut h = harness();

    h.ledger
        .create_project(ADMIN, project_input(1, 1, 10, &[]))
        .unwrap();
    assert_matches!(
        h.ledger.create_project(ADMIN, project_input(1, 1, 10, &[])),
        Err(CoreError::AlreadyExists { entity: "Project", id: 1 })
    );

    h.ledger.create_milestone(ADMIN, 7, 1).unwrap();
    assert_matches!(
        h.ledger.create_milestone(ADMIN, 7, 1),
        Err(CoreError::AlreadyExists { entity: "Milestone", id: 7 })
    );
}

#[test]
fn zero_id_tasks_or_cost_leave_no_record() {
    let mut h = harness();

    for input in [
        project_input(0, 3, 10, &[]),
        project_input(1, 0, 10, &[]),
        project_input(1, 3, 0, &[]),
    ] {
        assert_matches!(
            h.ledger.create_project(ADMIN, input),
            Err(CoreError::InvalidArgument(_))
        );
    }
    assert!(h.ledger.project(0).is_none());
    assert!(h.ledger.project(1).is_none());
    assert!(h.log.is_empty());
}

#[test]
fn non_future_deadline_is_rejected() {
    let mut h = harness();

    let mut input = project_input(1, 3, 10, &[10]);
    input.deadline = h.clock.now();
    assert_matches!(
        h.ledger.create_project(ADMIN, input.clone()),
        Err(CoreError::InvalidArgument(_))
    );

    input.deadline = h.clock.now() - Duration::hours(1);
    assert_matches!(
        h.ledger.create_project(ADMIN, input),
        Err(CoreError::InvalidArgument(_))
    );
    assert!(h.ledger.milestone(10).is_none());
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

#[test]
fn completing_every_milestone_completes_the_project() {
    let mut h = harness();
    h.ledger
        .create_project(ADMIN, project_input(1, 3, 10, &[10, 20, 30]))
        .unwrap();
    assert_eq!(h.ledger.project_progress(1), (0, 3));

    h.ledger.complete_milestone(ADMIN, 10, 1).unwrap();
    assert_eq!(h.ledger.project_progress(1), (1, 3));
    assert_eq!(h.ledger.project(1).unwrap().status, ProjectStatus::InProgress);

    h.ledger.complete_milestone(ADMIN, 20, 1).unwrap();
    h.ledger.complete_milestone(ADMIN, 30, 1).unwrap();
    assert_eq!(h.ledger.project_progress(1), (3, 3));
    assert_eq!(h.ledger.project(1).unwrap().status, ProjectStatus::Completed);
}

#[test]
fn recompleting_keeps_counters() {
    let mut h = harness();
    h.ledger
        .create_project(ADMIN, project_input(1, 3, 10, &[10, 20, 30]))
        .unwrap();
    h.ledger.complete_milestone(ADMIN, 10, 1).unwrap();

    assert_matches!(
        h.ledger.complete_milestone(ADMIN, 10, 1),
        Err(CoreError::InvalidState(_))
    );
    assert_eq!(h.ledger.project_progress(1), (1, 3));
}

#[test]
fn counter_at_maximum_wraps() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let log = Arc::new(NotificationLog::new());

    let mut state = LedgerState::default();
    state.projects.insert(
        1,
        Project {
            id: 1,
            total_tasks: 3,
            total_tasks_completed: u64::MAX,
            cost: 10,
            ..Project::default()
        },
    );
    let mut ledger = Ledger::with_state(state, clock, log);
    ledger.initialize(ADMIN).unwrap();
    ledger.create_milestone(ADMIN, 10, 1).unwrap();

    ledger.complete_milestone(ADMIN, 10, 1).unwrap();
    assert_eq!(ledger.project_progress(1), (0, 3));
}

// ---------------------------------------------------------------------------
// Deletion & field updates
// ---------------------------------------------------------------------------

#[test]
fn deleted_id_is_reusable_and_not_completable() {
    let mut h = harness();
    h.ledger
        .create_project(ADMIN, project_input(1, 3, 10, &[10, 20, 30]))
        .unwrap();

    h.ledger.delete_milestone(ADMIN, 20).unwrap();
    assert_matches!(
        h.ledger.complete_milestone(ADMIN, 20, 1),
        Err(CoreError::NotFound { entity: "Milestone", id: 20 })
    );

    h.ledger.create_milestone(ADMIN, 20, 1).unwrap();
    h.ledger.complete_milestone(ADMIN, 20, 1).unwrap();
    assert_eq!(h.ledger.project_progress(1), (1, 3));
}

#[test]
fn client_change_notification_tracks_stored_value() {
    let mut h = harness();
    h.ledger
        .create_project(ADMIN, project_input(1, 1, 10, &[]))
        .unwrap();
    h.log.drain();

    h.ledger.update_project_client(ADMIN, 1, 99).unwrap();
    h.ledger.update_project_client(ADMIN, 1, 99).unwrap();

    let entries = h.log.snapshot();
    assert_eq!(
        entries[0],
        Notification::ProjectClientChanged {
            previous: 4,
            new: 99,
            project_id: 1
        }
    );
    for entry in &entries {
        assert_matches!(entry, Notification::ProjectClientChanged { new: 99, .. });
    }
    assert_eq!(h.ledger.project(1).unwrap().client_id, 99);
}

#[test]
fn progress_of_unknown_project_is_zero() {
    let h = harness();
    assert_eq!(h.ledger.project_progress(404), (0, 0));
}
