//! Users API: an HTTP user-profile and password-check service with
//! built-in OpenTelemetry instrumentation.
//!
//! The service exposes a read-only user lookup backed by SQLite and a
//! password-check endpoint whose latency and outcome are measured on
//! every call.
//!
//! # Architecture
//!
//! - **Read-Only Store**: user records come from a pooled SQLite read
//!   connection; the request path never writes
//! - **Adaptive Hashing**: credentials are verified with bcrypt, so the
//!   comparison cost is the intended bottleneck of the auth path
//! - **Observable**: OpenTelemetry metrics and tracing, with W3C trace
//!   context propagation on the HTTP surface
//!
//! # Modules
//!
//! - [`auth`]: password verification and outcome classification
//! - [`config`]: CLI and environment configuration
//! - [`observability`]: metrics, tracing, and propagation setup
//! - [`server`]: HTTP server setup
//! - [`service`]: HTTP handlers (GET /user, POST /user/auth)
//! - [`storage`]: SQLite persistence layer

// Lint configuration
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions,    // service::users::UserResponse is fine
    clippy::must_use_candidate,         // Not all functions need #[must_use]
    clippy::missing_errors_doc,         // Error docs can be verbose
    clippy::missing_panics_doc,         // Panic docs can be verbose
    clippy::needless_raw_string_hashes  // r#""# is fine for SQL
)]

pub mod auth;
pub mod config;
pub mod observability;
pub mod server;
pub mod service;
pub mod storage;
