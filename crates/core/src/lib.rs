//! Milestone tracker domain logic.
//!
//! Pure business logic with no database dependencies. Persistence lives in
//! `tracker_db`, notification fan-out in `tracker_events`.
//!
//! - [`ledger::Ledger`]: the operation surface (roles, pause, projects, milestones).
//! - [`state::LedgerState`]: durable state with a stable layout.
//! - [`notification`]: change notifications and the sink contract.

pub mod access;
pub mod clock;
pub mod error;
pub mod ledger;
pub mod lifecycle;
pub mod milestone;
pub mod notification;
pub mod pause;
pub mod project;
pub mod revision;
pub mod roles;
pub mod state;
pub mod types;

pub use ledger::Ledger;
