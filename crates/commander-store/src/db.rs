//! Database connection management
//!
//! Opening, configuring and preparing SQLite connections

use std::path::Path;
use std::time::Duration;

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;

/// Connection string selecting a private in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// How long a writer waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Table holding Command records
///
/// AUTOINCREMENT keeps SQLite from reusing the id of a deleted row.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS commands (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    how_to TEXT NOT NULL,
    platform TEXT NOT NULL CHECK (length(platform) <= 5),
    command_line TEXT NOT NULL
);
";

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(|e| from_rusqlite("open", e))
}

/// Open an in-memory SQLite database
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(|e| from_rusqlite("open", e))
}

/// Configure a file-backed connection
pub fn configure(conn: &Connection) -> Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(|e| from_rusqlite("configure", e))?;

    // WAL lets readers proceed while a request commits
    let _mode: String = conn
        .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
        .map_err(|e| from_rusqlite("configure", e))?;

    Ok(())
}

/// Create the `commands` table if it does not exist yet
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .map_err(|e| from_rusqlite("ensure_schema", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let conn = open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'commands'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_schema_rejects_long_platform() {
        let conn = open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO commands (how_to, platform, command_line) VALUES ('a', 'windows', 'dir')",
            [],
        );
        assert!(result.is_err());
    }
}
