//! Milestone tracker notification infrastructure.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`; also a [`NotificationSink`](tracker_core::notification::NotificationSink).
//! - [`LedgerEvent`]: the envelope every ledger notification travels in.
//! - [`EventPersistence`]: background service that durably writes every
//!   event to the `ledger_events` table.

pub mod bus;
pub mod persistence;

pub use bus::{EventBus, LedgerEvent};
pub use persistence::EventPersistence;
