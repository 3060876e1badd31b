//! Serialized access to the ledger with database write-through.
//!
//! Every operation runs under one async mutex. A mutation that succeeds in
//! memory is written to PostgreSQL (when configured) before the lock is
//! released; if that write fails the touched records are rolled back and the
//! staged notifications are discarded. Notifications reach the
//! [`EventBus`] only after the write has committed.
//!
//! The critical section runs on its own task, so a caller that stops
//! waiting (client disconnect, request timeout) cannot leave a mutation
//! applied in memory but neither persisted nor rolled back.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracker_core::clock::Clock;
use tracker_core::error::CoreError;
use tracker_core::notification::NotificationLog;
use tracker_core::state::LedgerState;
use tracker_core::types::Identity;
use tracker_core::Ledger;
use tracker_db::repositories::LedgerStateRepo;
use tracker_db::DbPool;
use tracker_events::{EventBus, LedgerEvent};

use crate::error::{AppError, AppResult};

pub struct LedgerService {
    ledger: Mutex<Ledger>,
    outbox: Arc<NotificationLog>,
    pool: Option<DbPool>,
    event_bus: Arc<EventBus>,
}

impl LedgerService {
    pub fn new(
        state: LedgerState,
        clock: Arc<dyn Clock>,
        pool: Option<DbPool>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let outbox = Arc::new(NotificationLog::new());
        let ledger = Ledger::with_state(state, clock, outbox.clone());
        Self {
            ledger: Mutex::new(ledger),
            outbox,
            pool,
            event_bus,
        }
    }

    /// Run a read-only query against the ledger.
    pub async fn read<T>(&self, query: impl FnOnce(&Ledger) -> T) -> T {
        let ledger = self.ledger.lock().await;
        query(&ledger)
    }

    /// Run a mutation on behalf of `actor`, persist what it touched and
    /// publish its notifications.
    ///
    /// Dropping the returned future does not abandon the mutation: it still
    /// commits or rolls back on the spawned task.
    pub async fn execute<T, F>(self: &Arc<Self>, actor: Identity, operation: F) -> AppResult<T>
    where
        F: FnOnce(&mut Ledger) -> Result<T, CoreError> + Send + 'static,
        T: Send + 'static,
    {
        let service = Arc::clone(self);
        tokio::spawn(async move { service.commit(actor, operation).await })
            .await
            .map_err(|err| {
                tracing::error!(error = %err, actor, "Ledger task failed");
                AppError::InternalError("Ledger task failed".into())
            })?
    }

    async fn commit<T>(
        &self,
        actor: Identity,
        operation: impl FnOnce(&mut Ledger) -> Result<T, CoreError>,
    ) -> AppResult<T> {
        let mut ledger = self.ledger.lock().await;

        let value = match operation(&mut ledger) {
            Ok(value) => value,
            Err(err) => {
                // Failed operations touch nothing, but never leak stale entries.
                ledger.rollback();
                self.outbox.drain();
                return Err(err.into());
            }
        };

        if let Some(pool) = &self.pool {
            let result = LedgerStateRepo::apply(pool, ledger.state(), ledger.pending_changes()).await;
            if let Err(err) = result {
                ledger.rollback();
                let discarded = self.outbox.drain().len();
                tracing::error!(
                    error = %err,
                    actor,
                    discarded,
                    "Ledger write-through failed, state rolled back"
                );
                return Err(AppError::Database(err));
            }
        }
        ledger.take_changes();

        for notification in self.outbox.drain() {
            self.event_bus
                .publish(LedgerEvent::from_notification(&notification).with_actor(actor));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;
    use sqlx::postgres::PgPoolOptions;
    use tokio::net::TcpListener;
    use tracker_core::clock::SystemClock;
    use tracker_core::revision::LogicRevision;
    use tracker_core::roles::Role;

    use super::*;

    fn service(bus: Arc<EventBus>, pool: Option<DbPool>) -> Arc<LedgerService> {
        Arc::new(LedgerService::new(
            LedgerState::new(LogicRevision::LATEST),
            Arc::new(SystemClock),
            pool,
            bus,
        ))
    }

    /// A pool whose connections never finish the handshake, so every write
    /// through it fails after `acquire_timeout`.
    fn lazy_pool(addr: std::net::SocketAddr, acquire_timeout: Duration) -> DbPool {
        PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(acquire_timeout)
            .connect_lazy(&format!("postgres://tracker:tracker@{addr}/tracker"))
            .unwrap()
    }

    #[tokio::test]
    async fn committed_notifications_are_published_with_actor() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let service = service(bus, None);

        service.execute(5, |l| l.initialize(5)).await.unwrap();

        for expected in ["DEFAULT_ADMIN_ROLE", "ADMIN", "PAUSER"] {
            let event = rx.recv().await.unwrap();
            assert_eq!(event.event_type, "ledger.role_granted");
            assert_eq!(event.actor, Some(5));
            assert_eq!(event.payload["role"], expected);
        }
        assert!(service.read(|l| l.has_role(Role::Admin, 5)).await);
    }

    #[tokio::test]
    async fn failed_operation_publishes_nothing() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let service = service(bus, None);

        let err = service.execute(5, |l| l.pause(5)).await.unwrap_err();
        assert_matches!(err, AppError::Core(CoreError::Unauthorized { .. }));
        assert!(rx.try_recv().is_err());
        assert!(service.outbox.is_empty());
    }

    #[tokio::test]
    async fn failed_write_through_rolls_back_and_stays_silent() {
        // Bind then drop so nothing listens on the port.
        let addr = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap()
            .local_addr()
            .unwrap();
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let service = service(bus, Some(lazy_pool(addr, Duration::from_millis(500))));
        let before = service.read(|l| l.state().clone()).await;

        let err = service.execute(5, |l| l.initialize(5)).await.unwrap_err();

        assert_matches!(err, AppError::Database(_));
        assert_eq!(service.read(|l| l.state().clone()).await, before);
        assert!(service.read(|l| l.pending_changes().is_empty()).await);
        assert!(service.outbox.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn abandoned_request_still_rolls_back() {
        // Accepts TCP connections but never answers the startup message.
        let silent = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = silent.local_addr().unwrap();
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let service = service(bus, Some(lazy_pool(addr, Duration::from_millis(500))));

        let abandoned =
            tokio::time::timeout(Duration::from_millis(100), service.execute(5, |l| l.initialize(5)))
                .await;
        assert!(abandoned.is_err());

        // The write keeps the lock until it fails, then the mutation is undone.
        let (initialized, admin, pending) = service
            .read(|l| {
                (
                    l.state().is_initialized(),
                    l.has_role(Role::Admin, 5),
                    l.pending_changes().is_empty(),
                )
            })
            .await;
        assert!(!initialized);
        assert!(!admin);
        assert!(pending);
        assert!(service.outbox.is_empty());
        assert!(rx.try_recv().is_err());
        drop(silent);
    }
}
