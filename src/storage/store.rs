//! Read-only user store backed by a pooled SQLite connection.
//!
//! Uses r2d2 with r2d2_sqlite for pooled read access. SQLite WAL mode allows
//! concurrent readers, and the pool opens the database with read-only flags
//! so the request path cannot mutate state.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OpenFlags, OptionalExtension};
use std::fmt;
use std::path::Path;
use thiserror::Error;

use super::schema::apply_reader_pragmas;

/// Error type for user store operations.
///
/// `NotFound` is distinct from the infrastructure variants so callers can map
/// it to a 404 instead of a 500, and skip error-span recording for it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("User not found")]
    NotFound,

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Stored credential hash for user {id} is not valid hex: {source}")]
    CorruptHash {
        id: i64,
        source: hex::FromHexError,
    },
}

/// A user record as returned by the store.
///
/// `credential_hash` is the decoded byte form of the stored bcrypt hash, or
/// `None` for an account with no password set. It is owned by the store layer
/// and never serialized back to a client.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub credential_hash: Option<Vec<u8>>,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field(
                "credential_hash",
                &self.credential_hash.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Contract for fetching user records by identifier.
pub trait UserStore: Send + Sync {
    /// Fetch the user record for `id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` when no such user exists, and an
    /// infrastructure variant on pool, query, or decode failures.
    fn fetch(&self, id: i64) -> Result<UserRecord, StoreError>;
}

/// Read connection pool over the SQLite user database.
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteUserStore {
    /// Create a new store for the given database path.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the SQLite database file
    /// * `max_size` - Maximum number of connections in the pool
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created.
    pub fn new<P: AsRef<Path>>(db_path: P, max_size: u32) -> Result<Self, StoreError> {
        let manager = SqliteConnectionManager::file(db_path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX);

        let pool = Pool::builder()
            .max_size(max_size)
            .connection_customizer(Box::new(ReaderConnectionCustomizer))
            .build(manager)?;

        Ok(Self { pool })
    }
}

impl UserStore for SqliteUserStore {
    fn fetch(&self, id: i64) -> Result<UserRecord, StoreError> {
        let conn = self.pool.get()?;

        let row = conn
            .query_row(
                "SELECT id, name, email, password FROM users WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                    ))
                },
            )
            .optional()?;

        let (id, name, email, password_hex) = row.ok_or(StoreError::NotFound)?;

        // A malformed stored encoding is an operational bug, not a mismatch.
        let credential_hash = match password_hex {
            None => None,
            Some(encoded) => Some(
                hex::decode(&encoded)
                    .map_err(|source| StoreError::CorruptHash { id, source })?,
            ),
        };

        Ok(UserRecord {
            id,
            name,
            email,
            credential_hash,
        })
    }
}

/// Connection customizer that applies reader pragmas.
#[derive(Debug)]
struct ReaderConnectionCustomizer;

impl r2d2::CustomizeConnection<rusqlite::Connection, rusqlite::Error>
    for ReaderConnectionCustomizer
{
    fn on_acquire(&self, conn: &mut rusqlite::Connection) -> Result<(), rusqlite::Error> {
        apply_reader_pragmas(conn)
    }
}
