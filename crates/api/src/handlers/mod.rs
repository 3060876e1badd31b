pub mod ledger;
pub mod milestone;
pub mod project;
