use std::collections::{BTreeMap, BTreeSet};

use super::store::{Change, RecordStore};
use crate::errors::{CommandError, Result};
use crate::model::{Command, CommandId};

/// Request-scoped unit of work over a [`RecordStore`]
///
/// Records read through `get_by_id` are tracked together with a snapshot of
/// their loaded state. Inserts, deletes and in-place edits of tracked
/// records are staged locally and only reach the store on `save`, as a
/// single atomic commit. Nothing staged here is visible to any other
/// repository until then.
///
/// There is no `update` verb: mutate the record returned by `get_by_id`
/// and call `save`.
pub struct CommandRepo<'s> {
    store: &'s dyn RecordStore,
    tracked: BTreeMap<CommandId, Tracked>,
    added: Vec<Command>,
    removed: BTreeSet<CommandId>,
}

struct Tracked {
    snapshot: Command,
    current: Command,
}

impl Tracked {
    fn new(command: Command) -> Self {
        Self {
            snapshot: command.clone(),
            current: command,
        }
    }

    fn is_dirty(&self) -> bool {
        self.current.id != self.snapshot.id || !self.current.same_content(&self.snapshot)
    }
}

/// What a successful `save` wrote
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveReport {
    /// Inserted records, in staging order, with their assigned ids
    pub created: Vec<Command>,
    /// Number of tracked records whose content was written back
    pub updated: usize,
    /// Number of removed records
    pub deleted: usize,
}

impl SaveReport {
    /// Check if the save wrote nothing
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated == 0 && self.deleted == 0
    }
}

impl<'s> CommandRepo<'s> {
    /// Open a unit of work against a store
    pub fn new(store: &'s dyn RecordStore) -> Self {
        Self {
            store,
            tracked: BTreeMap::new(),
            added: Vec::new(),
            removed: BTreeSet::new(),
        }
    }

    /// Every committed record, as a freshly built list
    ///
    /// Staged changes of this unit of work are not reflected.
    ///
    /// # Errors
    /// `Storage` if the store cannot be read.
    pub fn list_all(&self) -> Result<Vec<Command>> {
        self.store.scan()
    }

    /// Look up a record and start tracking it
    ///
    /// Returns `Ok(None)` when no record has this id, or when it has been
    /// staged for deletion in this unit of work. Edits made through the
    /// returned reference are written by the next `save`.
    ///
    /// # Errors
    /// `Storage` if the store cannot be read.
    pub fn get_by_id(&mut self, id: CommandId) -> Result<Option<&mut Command>> {
        if self.removed.contains(&id) {
            return Ok(None);
        }

        if !self.tracked.contains_key(&id) {
            match self.store.lookup(id)? {
                Some(command) => {
                    self.tracked.insert(id, Tracked::new(command));
                }
                None => return Ok(None),
            }
        }

        Ok(self.tracked.get_mut(&id).map(|t| &mut t.current))
    }

    /// Stage a new record for insertion
    ///
    /// The id is assigned by the store and appears in the `SaveReport`.
    ///
    /// # Errors
    /// `InvalidArgument` if the record already carries an id.
    pub fn create(&mut self, command: Command) -> Result<()> {
        if command.is_persisted() {
            return Err(CommandError::invalid_argument(
                "cannot create a command that already has an id",
            ));
        }

        self.added.push(command);
        Ok(())
    }

    /// Stage removal of a record previously obtained from `get_by_id`
    ///
    /// # Errors
    /// `InvalidArgument` if the record has no id or is not tracked by this
    /// unit of work.
    pub fn delete(&mut self, command: &Command) -> Result<()> {
        let id = command.id.ok_or_else(|| {
            CommandError::invalid_argument("cannot delete a command without an id")
        })?;

        if !self.tracked.contains_key(&id) {
            return Err(CommandError::invalid_argument(format!(
                "command {} is not tracked by this repository",
                id
            )));
        }

        self.removed.insert(id);
        Ok(())
    }

    /// Check whether `save` would write anything
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty()
            || !self.removed.is_empty()
            || self.tracked.values().any(Tracked::is_dirty)
    }

    /// Commit every staged change as one unit
    ///
    /// On failure nothing is discarded, so the same `save` can be retried.
    ///
    /// # Errors
    /// `InvalidArgument` if the id of a tracked record was changed;
    /// `Storage` if the store rejects the commit.
    pub fn save(&mut self) -> Result<SaveReport> {
        let mut changes = Vec::new();
        for command in &self.added {
            changes.push(Change::Insert(command.clone()));
        }

        let mut updated_ids = Vec::new();
        for (id, tracked) in &self.tracked {
            if self.removed.contains(id) || !tracked.is_dirty() {
                continue;
            }
            if tracked.current.id != Some(*id) {
                return Err(CommandError::invalid_argument(format!(
                    "id of command {} is immutable",
                    id
                )));
            }
            changes.push(Change::Update(tracked.current.clone()));
            updated_ids.push(*id);
        }

        for id in &self.removed {
            changes.push(Change::Delete(*id));
        }

        if changes.is_empty() {
            return Ok(SaveReport::default());
        }

        let assigned = self.store.commit(&changes)?;

        let created: Vec<Command> = self
            .added
            .drain(..)
            .zip(assigned)
            .map(|(command, id)| command.with_id(id))
            .collect();
        for command in &created {
            if let Some(id) = command.id {
                self.tracked.insert(id, Tracked::new(command.clone()));
            }
        }

        for id in &updated_ids {
            if let Some(tracked) = self.tracked.get_mut(id) {
                tracked.snapshot = tracked.current.clone();
            }
        }

        let removed = std::mem::take(&mut self.removed);
        for id in &removed {
            self.tracked.remove(id);
        }

        let report = SaveReport {
            created,
            updated: updated_ids.len(),
            deleted: removed.len(),
        };
        tracing::debug!(
            created = report.created.len(),
            updated = report.updated,
            deleted = report.deleted,
            "unit of work committed"
        );
        Ok(report)
    }
}
