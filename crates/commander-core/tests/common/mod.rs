use commander_core::{Command, CommandId, CommandRepo, MemoryStore, RecordStore};

/// Create a new empty store for testing
#[allow(dead_code)]
pub fn new_store() -> MemoryStore {
    MemoryStore::new()
}

/// Commit a command through a throwaway unit of work and return its id
#[allow(dead_code)]
pub fn seed_command(
    store: &dyn RecordStore,
    how_to: &str,
    platform: &str,
    line: &str,
) -> CommandId {
    let mut repo = CommandRepo::new(store);
    repo.create(Command::new(how_to, platform, line)).unwrap();
    let report = repo.save().unwrap();
    report.created[0].id.unwrap()
}
