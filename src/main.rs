//! vc-attendance - Main entry point
//!
//! Reads gateway events as JSON lines, reconstructs voice-channel attendance
//! sessions and records text-message activity.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vc_attendance::adapters::gateway::{file_stream, stdin_stream};
use vc_attendance::adapters::postgres::{self, PostgresMessageStore, PostgresSessionStore};
use vc_attendance::adapters::InMemoryActivityStore;
use vc_attendance::application::{
    ActivityService, AttendancePipeline, DeleteMessageHandler, RecordMessageHandler,
};
use vc_attendance::config::{AppConfig, FeedSource, LoggingConfig};
use vc_attendance::ports::{MessageStore, SessionStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    init_tracing(&config.logging);
    info!(
        min_session_secs = config.tracking.min_session_secs,
        lane_idle_timeout_secs = config.tracking.lane_idle_timeout_secs,
        "Starting vc-attendance"
    );

    let (sessions, messages) = open_stores(&config).await?;

    let events = match config.ingest.feed_source() {
        FeedSource::Stdin => {
            info!("Reading gateway events from stdin");
            stdin_stream()
        }
        FeedSource::File(path) => {
            info!(path = %path.display(), "Replaying gateway events from file");
            file_stream(&path)
                .await
                .with_context(|| format!("Failed to open gateway feed {}", path.display()))?
        }
    };

    let service = ActivityService::new(
        AttendancePipeline::new(sessions, &config.tracking),
        RecordMessageHandler::new(messages.clone(), config.ingest.command_prefix.clone()),
        DeleteMessageHandler::new(messages),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let stats = service.run(events, shutdown_rx).await;
    info!(
        sessions_persisted = stats.sessions_persisted,
        persist_failures = stats.persist_failures,
        "Shutdown complete"
    );
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.log_level));
    let json = logging.use_json();

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .init();
}

async fn open_stores(
    config: &AppConfig,
) -> Result<(Arc<dyn SessionStore>, Arc<dyn MessageStore>)> {
    let Some(database) = &config.database else {
        warn!("No database configured; activity is kept in memory and lost on exit");
        let store = Arc::new(InMemoryActivityStore::new());
        let sessions: Arc<dyn SessionStore> = store.clone();
        let messages: Arc<dyn MessageStore> = store;
        return Ok((sessions, messages));
    };

    let pool = postgres::connect(database)
        .await
        .context("Failed to connect to database")?;
    if database.run_migrations {
        postgres::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;
    }

    let sessions: Arc<dyn SessionStore> = Arc::new(PostgresSessionStore::new(pool.clone()));
    let messages: Arc<dyn MessageStore> = Arc::new(PostgresMessageStore::new(pool));
    Ok((sessions, messages))
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
