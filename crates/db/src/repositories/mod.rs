//! Repository layer: one unit struct per table, plus [`LedgerStateRepo`]
//! which loads and writes through the whole ledger state.

pub mod ledger_event_repo;
pub mod ledger_meta_repo;
pub mod ledger_state_repo;
pub mod milestone_repo;
pub mod project_repo;
pub mod role_grant_repo;

pub use ledger_event_repo::LedgerEventRepo;
pub use ledger_meta_repo::LedgerMetaRepo;
pub use ledger_state_repo::LedgerStateRepo;
pub use milestone_repo::MilestoneRepo;
pub use project_repo::ProjectRepo;
pub use role_grant_repo::RoleGrantRepo;
