//! Users API: an HTTP user-profile and password-check service.
//!
//! # Usage
//!
//! ```bash
//! users-api --port 8080 --db-path ./users.db --log-level info
//! ```
//!
//! Environment variables can also be used:
//! - `USERS_API_PORT`: Port to listen on
//! - `USERS_API_DB_PATH`: Path to the SQLite user database
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: Collector endpoint for span/metric export
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)

use users_api::config::Config;
use users_api::observability::metrics::build_meter_provider;
use users_api::observability::tracing::init_tracing;
use users_api::observability::{resource, TelemetryGuard};
use users_api::server::run_server;
use users_api::storage::schema::prepare_database;

use tokio::sync::watch;

/// Print startup banner with version and configuration.
fn print_banner(config: &Config) {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        r#"
   _   _                     _    ____ ___
  | | | |___  ___ _ __ ___  / \  |  _ \_ _|
  | | | / __|/ _ \ '__/ __|/ _ \ | |_) | |
  | |_| \__ \  __/ |  \__ / ___ \|  __/| |
   \___/|___/\___|_|  |__/_/   \_\_|  |___|

  users-api v{} - User Profile & Password Check

  Configuration:
    Address:    {}:{}
    Database:   {}
    Log Level:  {}

  Press Ctrl+C to shutdown gracefully.
"#,
        version,
        config.host,
        config.port,
        config.db_path.display(),
        config.log_level
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse configuration from CLI arguments and environment
    let config = Config::parse_args();

    let telemetry_resource = resource(&config.environment);

    // Initialize tracing/logging (with optional OTLP span export)
    let tracer_provider = init_tracing(
        &config.log_level,
        config.otel_endpoint.as_deref(),
        telemetry_resource.clone(),
    );

    // Initialize metrics (with optional OTLP export)
    let meter_provider =
        build_meter_provider(config.otel_endpoint.as_deref(), telemetry_resource);

    // Providers are flushed on every exit path, including panics
    let telemetry = TelemetryGuard::new(tracer_provider, meter_provider.clone());

    // Ensure the database and schema exist before the read pool opens
    prepare_database(&config.db_path, config.seed_demo)?;

    // Print startup banner
    print_banner(&config);

    // Create shutdown signal channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Spawn signal handler task
    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        // Wait for SIGTERM or SIGINT (Ctrl+C)
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm =
                signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

            tokio::select! {
                _ = ctrl_c => {
                    tracing::info!("Received SIGINT (Ctrl+C), initiating shutdown...");
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating shutdown...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            ctrl_c.await.expect("failed to listen for ctrl+c");
            tracing::info!("Received Ctrl+C, initiating shutdown...");
        }

        // Signal shutdown
        let _ = shutdown_tx_clone.send(true);
    });

    // Run the server
    run_server(config, &meter_provider, shutdown_rx)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    // Flush spans and metrics before exit
    telemetry.shutdown();

    tracing::info!("users-api shutdown complete");
    Ok(())
}
