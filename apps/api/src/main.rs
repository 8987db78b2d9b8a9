//! # Stockroom API Server
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom API Server                             │
//! │                                                                         │
//! │  Dashboard ───► HTTP (8080) ───► Router ───► SQLite                     │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │                                 ChangeFeed                              │
//! │                                   (SSE)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use stockroom_api::config::AppConfig;
use stockroom_api::{build_router, ensure_owner, AppState};
use stockroom_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before logging so the filter can come from it
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing; RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Starting Stockroom API server...");
    info!(
        bind_addr = %config.bind_addr,
        database = %config.database_path,
        token_lifetime_secs = config.token_lifetime_secs,
        "Configuration loaded"
    );
    if config.uses_dev_secret() {
        warn!("Using the built-in development JWT secret with an in-memory database");
    }

    // Open database (runs migrations)
    let db = Database::new(DbConfig::new(&config.database_path))
        .await
        .context("Failed to open database")?;
    info!("Database ready");

    // First owner account
    if let Some(owner) = config.bootstrap_owner() {
        ensure_owner(&db, &owner)
            .await
            .context("Failed to create bootstrap owner")?;
    }

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(db.clone(), config);
    let shutdown = state.shutdown.clone();
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!(addr = %bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            // Ends open change-feed streams so in-flight responses can finish
            shutdown.trigger();
        })
        .await
        .context("Server error")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
