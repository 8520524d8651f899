//! HTTP server setup and lifecycle.
//!
//! Configures the axum server with:
//! - User lookup and password-check handlers
//! - Graceful shutdown support
//! - Health check endpoints

use opentelemetry::metrics::MeterProvider as _;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;

use crate::auth::Authenticator;
use crate::config::Config;
use crate::observability::metrics::AuthMetrics;
use crate::service;
use crate::storage::{SqliteUserStore, UserStore};

/// Server state shared across handlers.
pub struct ServerState {
    pub store: Arc<dyn UserStore>,
    pub authenticator: Authenticator,
}

/// Run the users-api HTTP server.
///
/// # Arguments
///
/// * `config` - Server configuration
/// * `meter_provider` - Provider the password-check instruments are built from
/// * `shutdown_rx` - Receiver for shutdown signal
///
/// # Returns
///
/// Returns when the server has shut down.
pub async fn run_server(
    config: Config,
    meter_provider: &SdkMeterProvider,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    // Create the read-only store pool
    let store = SqliteUserStore::new(&config.db_path, config.reader_pool_size)?;

    // Build the password-check telemetry sink and inject it
    let telemetry = Arc::new(AuthMetrics::new(&meter_provider.meter("users-api")));
    let authenticator = Authenticator::new(telemetry);

    // Create shared state
    let state = Arc::new(ServerState {
        store: Arc::new(store),
        authenticator,
    });

    let app = service::router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Starting users-api HTTP server");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            // Wait for shutdown signal
            let _ = shutdown_rx.changed().await;
            tracing::info!("Shutdown signal received, stopping server");
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
