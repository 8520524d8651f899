//! SQLite storage layer for the users-api.
//!
//! Provides:
//! - Schema initialization and demo seeding
//! - Read connection pool for user lookups
//! - The `UserStore` contract consumed by the HTTP handlers

pub mod schema;
pub mod store;

pub use store::{SqliteUserStore, StoreError, UserRecord, UserStore};
