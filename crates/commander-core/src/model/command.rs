use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a Command record
pub type CommandId = i64;

/// Command - a stored how-to for a single command line
///
/// A Command pairs a human description (`how_to`) with the literal
/// `command_line` to run and a short `platform` tag such as `unix` or `pwsh`.
/// Content rules (presence, platform length) are enforced by the validator
/// before a record is built, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Identifier assigned by the store on commit (None until then)
    pub id: Option<CommandId>,

    /// What the command does
    pub how_to: String,

    /// Platform tag, at most five characters once validated
    pub platform: String,

    /// The literal command line
    pub command_line: String,
}

impl Command {
    /// Create a new, not yet persisted Command
    pub fn new(
        how_to: impl Into<String>,
        platform: impl Into<String>,
        command_line: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            how_to: how_to.into(),
            platform: platform.into(),
            command_line: command_line.into(),
        }
    }

    /// Attach a store-assigned id
    pub fn with_id(mut self, id: CommandId) -> Self {
        self.id = Some(id);
        self
    }

    /// Check if this Command has been committed to a store
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Compare the three content fields, ignoring the id
    pub fn same_content(&self, other: &Command) -> bool {
        self.how_to == other.how_to
            && self.platform == other.platform
            && self.command_line == other.command_line
    }
}
