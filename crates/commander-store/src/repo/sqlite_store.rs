//! SQLite record store
//!
//! Persists Command records in the `commands` table

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use commander_core::{Change, Command, CommandError, CommandId, RecordStore};
use rusqlite::{Connection, OptionalExtension, Row, Transaction};

use crate::db;
use crate::errors::{from_rusqlite, lock_poisoned, row_vanished, Result};

/// SQLite-backed [`RecordStore`]
///
/// One connection shared behind a mutex. Each `commit` runs in its own
/// transaction, so a batch is either fully visible or not at all.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file and make sure the table exists
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = db::open(path)?;
        db::configure(&conn)?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(db::open_in_memory()?)
    }

    /// Open from a configured connection string (`:memory:` or a file path)
    pub fn connect(connection_string: &str) -> Result<Self> {
        if connection_string == db::IN_MEMORY {
            Self::open_in_memory()
        } else {
            Self::open(connection_string)
        }
    }

    /// Wrap an already opened connection
    pub fn from_connection(conn: Connection) -> Result<Self> {
        db::ensure_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Number of stored records
    pub fn count(&self) -> Result<usize> {
        let conn = self.lock("count")?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM commands", [], |row| row.get(0))
            .map_err(|e| from_rusqlite("count", e))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn lock(&self, op: &str) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| lock_poisoned(op))
    }
}

fn command_from_row(row: &Row<'_>) -> rusqlite::Result<Command> {
    let id: CommandId = row.get(0)?;
    let how_to: String = row.get(1)?;
    let platform: String = row.get(2)?;
    let command_line: String = row.get(3)?;

    Ok(Command::new(how_to, platform, command_line).with_id(id))
}

fn apply_change(tx: &Transaction<'_>, change: &Change) -> Result<Option<CommandId>> {
    match change {
        Change::Insert(command) => {
            tx.execute(
                "INSERT INTO commands (how_to, platform, command_line) VALUES (?1, ?2, ?3)",
                rusqlite::params![command.how_to, command.platform, command.command_line],
            )
            .map_err(|e| from_rusqlite("commit", e))?;
            Ok(Some(tx.last_insert_rowid()))
        }
        Change::Update(command) => {
            let id = command
                .id
                .ok_or_else(|| CommandError::storage("commit", "update without an id"))?;
            let affected = tx
                .execute(
                    "UPDATE commands SET how_to = ?1, platform = ?2, command_line = ?3 \
                     WHERE id = ?4",
                    rusqlite::params![
                        command.how_to,
                        command.platform,
                        command.command_line,
                        id
                    ],
                )
                .map_err(|e| from_rusqlite("commit", e))?;
            if affected == 0 {
                return Err(row_vanished(id));
            }
            Ok(None)
        }
        Change::Delete(id) => {
            let affected = tx
                .execute("DELETE FROM commands WHERE id = ?1", [id])
                .map_err(|e| from_rusqlite("commit", e))?;
            if affected == 0 {
                return Err(row_vanished(*id));
            }
            Ok(None)
        }
    }
}

impl RecordStore for SqliteStore {
    fn scan(&self) -> Result<Vec<Command>> {
        let conn = self.lock("scan")?;
        let mut stmt = conn
            .prepare("SELECT id, how_to, platform, command_line FROM commands ORDER BY id")
            .map_err(|e| from_rusqlite("scan", e))?;

        let commands = stmt
            .query_map([], command_from_row)
            .map_err(|e| from_rusqlite("scan", e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| from_rusqlite("scan", e))?;

        Ok(commands)
    }

    fn lookup(&self, id: CommandId) -> Result<Option<Command>> {
        let conn = self.lock("lookup")?;
        conn.query_row(
            "SELECT id, how_to, platform, command_line FROM commands WHERE id = ?1",
            [id],
            command_from_row,
        )
        .optional()
        .map_err(|e| from_rusqlite("lookup", e))
    }

    fn commit(&self, changes: &[Change]) -> Result<Vec<CommandId>> {
        let mut conn = self.lock("commit")?;
        let tx = conn
            .transaction()
            .map_err(|e| from_rusqlite("commit", e))?;

        // An early return drops `tx`, which rolls the batch back
        let mut assigned = Vec::new();
        for change in changes {
            if let Some(id) = apply_change(&tx, change)? {
                assigned.push(id);
            }
        }

        tx.commit().map_err(|e| from_rusqlite("commit", e))?;
        tracing::debug!(changes = changes.len(), "sqlite batch committed");
        Ok(assigned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_then_lookup() {
        let store = SqliteStore::open_in_memory().unwrap();
        let ids = store
            .commit(&[Change::Insert(Command::new("list files", "unix", "ls -la"))])
            .unwrap();

        let stored = store.lookup(ids[0]).unwrap().unwrap();
        assert_eq!(stored, Command::new("list files", "unix", "ls -la").with_id(ids[0]));
    }

    #[test]
    fn test_lookup_missing_is_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.lookup(999).unwrap().is_none());
    }

    #[test]
    fn test_connect_memory_string() {
        let store = SqliteStore::connect(":memory:").unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }
}
