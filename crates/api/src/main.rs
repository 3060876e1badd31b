use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tracker_api::config::ServerConfig;
use tracker_api::router::build_app_router;
use tracker_api::service::LedgerService;
use tracker_api::state::AppState;
use tracker_core::clock::SystemClock;
use tracker_core::state::LedgerState;
use tracker_db::repositories::LedgerStateRepo;
use tracker_events::{EventBus, EventPersistence};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tracker_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env()?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());

    // --- Database & ledger state ---
    let (pool, ledger_state, persistence_handle) = match &config.database_url {
        Some(database_url) => {
            let pool = tracker_db::create_pool(database_url)
                .await
                .context("Failed to connect to database")?;
            tracker_db::health_check(&pool)
                .await
                .context("Database health check failed")?;
            tracker_db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database ready, migrations applied");

            let ledger_state = match LedgerStateRepo::load(&pool)
                .await
                .context("Failed to load ledger state")?
            {
                Some(state) => state,
                None => {
                    tracing::info!(
                        revision = config.logic_revision.number,
                        "No persisted ledger, starting fresh"
                    );
                    LedgerState::new(config.logic_revision)
                }
            };

            let handle = tokio::spawn(EventPersistence::run(pool.clone(), event_bus.subscribe()));
            (Some(pool), ledger_state, Some(handle))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, ledger state is kept in memory only");
            (None, LedgerState::new(config.logic_revision), None)
        }
    };

    // --- App state ---
    let ledger = LedgerService::new(
        ledger_state,
        Arc::new(SystemClock),
        pool.clone(),
        Arc::clone(&event_bus),
    );
    let state = AppState {
        ledger: Arc::new(ledger),
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };

    let app = build_app_router(state, &config)?;

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().context("Invalid HOST address")?,
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped accepting connections, cleaning up");

    // Dropping the last bus handle closes the channel and ends persistence.
    drop(event_bus);
    if let Some(handle) = persistence_handle {
        let wait = Duration::from_secs(config.shutdown_timeout_secs);
        if tokio::time::timeout(wait, handle).await.is_err() {
            tracing::warn!("Event persistence did not finish before the shutdown timeout");
        }
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
