pub mod ledger_event;
pub mod ledger_meta;
pub mod milestone;
pub mod project;
pub mod role_grant;
