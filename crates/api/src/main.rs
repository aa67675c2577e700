mod config;
mod error;
mod middleware;
mod routes;
mod state;

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;
use weave_content_core::events::EventBus;
use weave_content_core::store::{ContentRepository, MemoryContentRepository, PgContentRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience)
    let _ = dotenvy::dotenv();

    let config = config::AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    tracing::info!("Starting content API server");

    let repository: Arc<dyn ContentRepository> = match &config.database_url {
        Some(url) => {
            let repo = PgContentRepository::connect(
                url,
                config.db_max_connections,
                config.db_min_connections,
            )
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to database: {e}"))?;
            tracing::info!("Connected to PostgreSQL");

            repo.migrate()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to run migrations: {e}"))?;
            tracing::info!("Database migrations applied");
            Arc::new(repo)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, content is kept in memory only");
            Arc::new(MemoryContentRepository::new())
        }
    };

    let event_bus = EventBus::new(config.event_bus_capacity);
    tokio::spawn(log_content_events(event_bus.clone()));

    let state = state::AppState::new(repository, event_bus);

    let app = routes::app(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Audit trail of content changes.
async fn log_content_events(bus: EventBus) {
    let mut rx = bus.subscribe();
    loop {
        match rx.recv().await {
            Ok(event) => {
                let change = event.change();
                tracing::info!(
                    kind = event.kind(),
                    section = %change.section,
                    content_id = %change.content_id,
                    status = %change.status,
                    "content event"
                );
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "content event log lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
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
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { tracing::info!("Received Ctrl+C, shutting down..."); }
        _ = terminate => { tracing::info!("Received SIGTERM, shutting down..."); }
    }
}
