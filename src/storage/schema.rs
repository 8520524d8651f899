//! Schema initialization for the user database.
//!
//! The request path only ever reads; schema creation and demo seeding happen
//! once at startup over a dedicated write connection, before the read pool
//! opens.

use rusqlite::{params, Connection};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error type for schema operations.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Failed to create database directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to hash demo credential: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Apply pragmas for the startup write connection.
pub fn apply_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "busy_timeout", 5000)?;
    Ok(())
}

/// Apply pragmas for pooled read connections.
pub fn apply_reader_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "busy_timeout", 5000)?;
    Ok(())
}

/// Create the users table if it does not exist.
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            name     TEXT NOT NULL,
            email    TEXT NOT NULL,
            password TEXT
        )
        "#,
        [],
    )?;
    Ok(())
}

/// Insert a user row.
///
/// `password_hex` is the hex-encoded bcrypt hash, or `None` for an account
/// with no password set. Returns the assigned user id.
pub fn insert_user(
    conn: &Connection,
    name: &str,
    email: &str,
    password_hex: Option<&str>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO users (name, email, password) VALUES (?1, ?2, ?3)",
        params![name, email, password_hex],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Open the database, ensure the schema exists, and optionally seed demo users.
pub fn prepare_database(db_path: &Path, seed_demo: bool) -> Result<(), SchemaError> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(db_path)?;
    apply_pragmas(&conn)?;
    initialize_schema(&conn)?;

    if seed_demo {
        seed_demo_users(&conn)?;
    }

    Ok(())
}

/// Seed demo users into an empty database.
///
/// Leaves an already-populated database untouched.
pub fn seed_demo_users(conn: &Connection) -> Result<(), SchemaError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    if count > 0 {
        tracing::debug!(count, "User table already populated, skipping demo seed");
        return Ok(());
    }

    let alice_hash = hex::encode(bcrypt::hash("wonderland", bcrypt::DEFAULT_COST)?.as_bytes());
    insert_user(conn, "alice", "alice@example.com", Some(&alice_hash))?;
    insert_user(conn, "bob", "bob@example.com", None)?;

    tracing::info!("Seeded demo users (alice has a password, bob does not)");
    Ok(())
}
