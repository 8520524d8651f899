//! Test utilities and fixtures for users-api tests.
//!
//! Provides:
//! - A seeded temporary user database
//! - An in-process router wired to real storage and metrics

use axum::Router;
use opentelemetry::metrics::MeterProvider as _;
use opentelemetry_sdk::metrics::{ManualReader, SdkMeterProvider};
use rusqlite::Connection;
use std::sync::Arc;
use tempfile::TempDir;

use users_api::auth::Authenticator;
use users_api::observability::metrics::AuthMetrics;
use users_api::server::ServerState;
use users_api::service;
use users_api::storage::schema::{initialize_schema, insert_user};
use users_api::storage::SqliteUserStore;

/// Password of the seeded user `alice` (id 1).
pub const ALICE_PASSWORD: &str = "secret";

/// In-process application over a seeded temporary database.
///
/// Seeded users:
/// - 1 alice: valid bcrypt hash of [`ALICE_PASSWORD`]
/// - 2 bob: no password set
/// - 3 carol: well-encoded but structurally invalid hash
/// - 4 dave: corrupt (non-hex) stored encoding
pub struct TestApp {
    /// Keeps the database directory alive for the test's duration
    _temp_dir: TempDir,
    /// Keeps the metric instruments functional for the test's duration
    _meter_provider: SdkMeterProvider,
    router: Router,
}

impl TestApp {
    /// Create a new app over a freshly seeded database.
    pub fn seeded() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let db_path = temp_dir.path().join("users.db");

        {
            let conn = Connection::open(&db_path).expect("failed to open database");
            initialize_schema(&conn).expect("failed to initialize schema");

            let alice_hash = bcrypt::hash(ALICE_PASSWORD, 4).expect("failed to hash");
            insert_user(
                &conn,
                "alice",
                "alice@example.com",
                Some(&hex::encode(alice_hash.as_bytes())),
            )
            .expect("failed to insert alice");
            insert_user(&conn, "bob", "bob@example.com", None).expect("failed to insert bob");
            insert_user(
                &conn,
                "carol",
                "carol@example.com",
                Some(&hex::encode(b"not-a-bcrypt-hash")),
            )
            .expect("failed to insert carol");
            insert_user(&conn, "dave", "dave@example.com", Some("zzzz"))
                .expect("failed to insert dave");
        }

        let reader = ManualReader::builder().build();
        let meter_provider = SdkMeterProvider::builder().with_reader(reader).build();
        let telemetry = Arc::new(AuthMetrics::new(&meter_provider.meter("users-api-test")));

        let store = SqliteUserStore::new(&db_path, 5).expect("failed to create store");
        let state = Arc::new(ServerState {
            store: Arc::new(store),
            authenticator: Authenticator::new(telemetry),
        });

        Self {
            _temp_dir: temp_dir,
            _meter_provider: meter_provider,
            router: service::router(state),
        }
    }

    /// Get a clone of the router for a oneshot request.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
