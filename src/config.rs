//! Configuration parsing for the users-api server.
//!
//! Supports:
//! - CLI arguments via clap
//! - Environment variable overrides
//! - Sensible defaults for quick start

use clap::Parser;
use std::path::PathBuf;

/// Users API: an HTTP user-profile and password-check service.
#[derive(Parser, Debug, Clone)]
#[command(name = "users-api")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Host address to bind to
    #[arg(long, env = "USERS_API_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "USERS_API_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Path to the SQLite user database
    #[arg(long, env = "USERS_API_DB_PATH", default_value = "./users.db")]
    pub db_path: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Size of the read connection pool
    #[arg(long, env = "USERS_API_READER_POOL_SIZE", default_value_t = 10)]
    pub reader_pool_size: u32,

    /// Deployment environment reported in telemetry resource attributes
    #[arg(long, env = "USERS_API_ENVIRONMENT", default_value = "dev")]
    pub environment: String,

    /// Insert demo users into an empty database on startup
    #[arg(long, env = "USERS_API_SEED_DEMO", default_value_t = false)]
    pub seed_demo: bool,

    /// OpenTelemetry collector endpoint for trace and metric export (optional)
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otel_endpoint: Option<String>,
}

impl Config {
    /// Parse configuration from CLI arguments and environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a default configuration for testing.
    #[cfg(test)]
    pub fn test_config(db_path: PathBuf) -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0, // Random port
            db_path,
            log_level: "debug".into(),
            reader_pool_size: 5,
            environment: "test".into(),
            seed_demo: false,
            otel_endpoint: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            db_path: PathBuf::from("./users.db"),
            log_level: "info".into(),
            reader_pool_size: 10,
            environment: "dev".into(),
            seed_demo: false,
            otel_endpoint: None,
        }
    }
}
