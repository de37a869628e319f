//! SitePulse Server — uptime monitoring with live updates
//!
//! Main entry point that wires all crates together: connects the
//! database, runs migrations, starts the check cycle controller, and
//! serves the HTTP/WebSocket API.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use pulse_core::config::AppConfig;
use pulse_core::error::AppError;
use pulse_database::repositories::PgSiteStore;
use pulse_monitor::{CycleController, SiteProber};
use pulse_realtime::NotificationHub;

#[tokio::main]
async fn main() {
    let env = std::env::var("PULSE_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting SitePulse v{}", env!("CARGO_PKG_VERSION"));

    // ── Database connection + migrations ─────────────────────────
    let db = pulse_database::DatabasePool::connect(&config.database).await?;
    pulse_database::migration::run_migrations(db.pool()).await?;
    let db_pool = db.into_pool();

    // ── Notification hub, shared by the API and the check cycle ──
    let hub = Arc::new(NotificationHub::new(&config.realtime));

    // ── Shutdown channel ─────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Check cycle controller ───────────────────────────────────
    let store = Arc::new(PgSiteStore::new(db_pool.clone()));
    let prober = SiteProber::new(&config.monitor)?;
    let controller = CycleController::new(
        store,
        prober,
        Arc::clone(&hub),
        config.monitor.clone(),
    );

    let monitor_cancel = shutdown_rx.clone();
    let monitor_handle = tokio::spawn(async move {
        controller.run(monitor_cancel).await;
    });

    // ── HTTP server ──────────────────────────────────────────────
    let state = pulse_api::AppState::new(Arc::new(config.clone()), db_pool, hub);
    let app = pulse_api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("SitePulse server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Wait for the controller to finish its cycle ──────────────
    let _ = tokio::time::timeout(std::time::Duration::from_secs(30), monitor_handle).await;

    tracing::info!("SitePulse server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
