use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::errors::{CommandError, Result};
use crate::model::{Command, CommandId};

/// One staged mutation handed to a store on commit
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Insert a new record; the store assigns its id
    Insert(Command),
    /// Overwrite the content of an existing record (its id must be set)
    Update(Command),
    /// Remove the record with this id
    Delete(CommandId),
}

/// Durable keyed storage for Command records
///
/// Implementations are shared by every request, so they must be safe for
/// concurrent use. `commit` is all-or-nothing: when it returns an error no
/// change in the batch is visible to any reader.
pub trait RecordStore: Send + Sync {
    /// Every stored record, ordered by id
    ///
    /// # Errors
    /// `Storage` if the store cannot be read.
    fn scan(&self) -> Result<Vec<Command>>;

    /// The record with this id, if any
    ///
    /// # Errors
    /// `Storage` if the store cannot be read.
    fn lookup(&self, id: CommandId) -> Result<Option<Command>>;

    /// Apply a batch of changes atomically
    ///
    /// Returns the ids assigned to the `Insert` changes, in batch order.
    ///
    /// # Errors
    /// `Storage` if any change cannot be applied (including an update or
    /// delete of a record that no longer exists).
    fn commit(&self, changes: &[Change]) -> Result<Vec<CommandId>>;
}

/// In-memory store for Command records
///
/// A `BTreeMap` behind a `Mutex`. Ids come from a counter that only grows,
/// so an id is never handed out twice even after its record is deleted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    records: BTreeMap<CommandId, Command>,
    last_id: CommandId,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    ///
    /// # Errors
    /// `Storage` if the lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock("len")?.records.len())
    }

    /// Check whether the store holds no records
    ///
    /// # Errors
    /// `Storage` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self, op: &str) -> Result<std::sync::MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| CommandError::storage(op, "memory store lock poisoned"))
    }
}

impl MemoryState {
    fn apply(&mut self, change: &Change) -> Result<Option<CommandId>> {
        match change {
            Change::Insert(command) => {
                self.last_id += 1;
                let id = self.last_id;
                self.records.insert(id, command.clone().with_id(id));
                Ok(Some(id))
            }
            Change::Update(command) => {
                let id = command
                    .id
                    .ok_or_else(|| CommandError::storage("commit", "update without an id"))?;
                let slot = self.records.get_mut(&id).ok_or_else(|| {
                    CommandError::storage("commit", format!("command {} no longer exists", id))
                })?;
                *slot = command.clone();
                Ok(None)
            }
            Change::Delete(id) => {
                self.records.remove(id).ok_or_else(|| {
                    CommandError::storage("commit", format!("command {} no longer exists", id))
                })?;
                Ok(None)
            }
        }
    }
}

impl RecordStore for MemoryStore {
    fn scan(&self) -> Result<Vec<Command>> {
        Ok(self.lock("scan")?.records.values().cloned().collect())
    }

    fn lookup(&self, id: CommandId) -> Result<Option<Command>> {
        Ok(self.lock("lookup")?.records.get(&id).cloned())
    }

    fn commit(&self, changes: &[Change]) -> Result<Vec<CommandId>> {
        let mut guard = self.lock("commit")?;

        // Work on a copy so a failing change leaves the store untouched
        let mut next = guard.clone();
        let mut assigned = Vec::new();
        for change in changes {
            if let Some(id) = next.apply(change)? {
                assigned.push(id);
            }
        }

        *guard = next;
        Ok(assigned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let ids = store
            .commit(&[
                Change::Insert(Command::new("a", "unix", "ls")),
                Change::Insert(Command::new("b", "unix", "pwd")),
            ])
            .unwrap();

        assert_eq!(ids, vec![1, 2]);
        assert_eq!(store.lookup(2).unwrap().unwrap().how_to, "b");
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let store = MemoryStore::new();
        let first = store
            .commit(&[Change::Insert(Command::new("a", "unix", "ls"))])
            .unwrap();
        store.commit(&[Change::Delete(first[0])]).unwrap();

        let second = store
            .commit(&[Change::Insert(Command::new("b", "unix", "pwd"))])
            .unwrap();
        assert_ne!(first[0], second[0]);
    }

    #[test]
    fn test_failed_commit_is_atomic() {
        let store = MemoryStore::new();
        let result = store.commit(&[
            Change::Insert(Command::new("a", "unix", "ls")),
            Change::Delete(42),
        ]);

        assert!(matches!(result, Err(CommandError::Storage { .. })));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_scan_is_ordered_by_id() {
        let store = MemoryStore::new();
        store
            .commit(&[
                Change::Insert(Command::new("a", "unix", "ls")),
                Change::Insert(Command::new("b", "unix", "pwd")),
                Change::Insert(Command::new("c", "unix", "cd")),
            ])
            .unwrap();

        let ids: Vec<_> = store.scan().unwrap().iter().filter_map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
