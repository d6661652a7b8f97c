//! Commander Store - SQLite persistence for Command records
//!
//! Provides:
//! - Connection helpers and the `commands` table definition
//! - `SqliteStore`, a `RecordStore` committing each batch in one transaction

pub mod db;
pub mod errors;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use repo::SqliteStore;
