//! List command
//!
//! Usage: commander list [--database PATH]

use anyhow::{bail, Context};
use clap::Args;
use commander_core::CommandRead;
use commander_engine::{apply_request, CommandRequest, RequestOutcome};
use commander_store::SqliteStore;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// SQLite database path
    #[arg(long, default_value = "commander.db")]
    pub database: String,
}

/// Execute list command
pub fn execute(args: ListArgs) -> anyhow::Result<()> {
    let commands = list_commands(&args.database)?;
    println!("{}", serde_json::to_string_pretty(&commands)?);
    Ok(())
}

fn list_commands(database: &str) -> anyhow::Result<Vec<CommandRead>> {
    let store = SqliteStore::connect(database)
        .with_context(|| format!("opening database '{}'", database))?;

    match apply_request(CommandRequest::List, &store)? {
        RequestOutcome::Listed(commands) => Ok(commands),
        other => bail!("unexpected outcome for list: {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commander_core::{Change, Command, RecordStore};

    #[test]
    fn test_lists_stored_commands() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("commander.db");
        let path_str = path.to_str().unwrap();

        let store = SqliteStore::open(&path).unwrap();
        store
            .commit(&[Change::Insert(Command::new("show dir", "unix", "pwd"))])
            .unwrap();
        drop(store);

        let commands = list_commands(path_str).unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].command_line, "pwd");
    }
}
