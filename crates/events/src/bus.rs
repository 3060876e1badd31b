//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`LedgerEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracker_core::notification::{Notification, NotificationSink};
use tracker_core::types::Identity;

// ---------------------------------------------------------------------------
// LedgerEvent
// ---------------------------------------------------------------------------

/// A ledger notification wrapped for transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Dot-separated event name, e.g. `"milestone.completed"`.
    pub event_type: String,

    /// Source entity kind (`"project"` or `"milestone"`), if any.
    pub source_entity_type: Option<String>,

    /// Source entity id, if any.
    pub source_entity_id: Option<u64>,

    /// Identity whose request produced the event.
    pub actor: Option<Identity>,

    /// The notification itself, serialized.
    pub payload: serde_json::Value,

    /// When the event was wrapped (UTC).
    pub timestamp: DateTime<Utc>,
}

impl LedgerEvent {
    /// Wrap a notification. Source entity and event name come from the
    /// notification itself.
    pub fn from_notification(notification: &Notification) -> Self {
        let (source_entity_type, source_entity_id) = match notification.source() {
            Some((kind, id)) => (Some(kind.to_string()), Some(id)),
            None => (None, None),
        };
        Self {
            event_type: notification.event_type().to_string(),
            source_entity_type,
            source_entity_id,
            actor: None,
            payload: serde_json::to_value(notification).unwrap_or(serde_json::Value::Null),
            timestamp: Utc::now(),
        }
    }

    /// Attach the acting identity.
    pub fn with_actor(mut self, actor: Identity) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Decode the payload back into a notification.
    pub fn notification(&self) -> Option<Notification> {
        serde_json::from_value(self.payload.clone()).ok()
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// # Usage
///
/// ```rust
/// use tracker_core::notification::Notification;
/// use tracker_events::bus::{EventBus, LedgerEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(LedgerEvent::from_notification(&Notification::MilestoneDeleted { id: 3 }));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<LedgerEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: LedgerEvent) {
        // Ignore the SendError; it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl NotificationSink for EventBus {
    fn emit(&self, notification: &Notification) {
        self.publish(LedgerEvent::from_notification(notification));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
