//! Error helpers for commander-store
//!
//! Every store failure surfaces as `CommandError::Storage`.

use commander_core::{CommandError, CommandId};

/// Result type alias using CommandError
pub type Result<T> = std::result::Result<T, CommandError>;

/// Create a storage error from rusqlite::Error
pub fn from_rusqlite(op: &str, err: rusqlite::Error) -> CommandError {
    CommandError::storage(op, err.to_string())
}

/// Create the error for an update or delete whose row is gone
pub fn row_vanished(id: CommandId) -> CommandError {
    CommandError::storage("commit", format!("command {} no longer exists", id))
}

/// Create the error for a connection whose lock was poisoned by a panic
pub fn lock_poisoned(op: &str) -> CommandError {
    CommandError::storage(op, "sqlite connection lock poisoned")
}
