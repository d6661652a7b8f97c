//! Record store implementations backed by SQLite

pub mod sqlite_store;

pub use sqlite_store::SqliteStore;
