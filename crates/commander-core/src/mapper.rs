//! Explicit field copies between DTOs and the Command record
//!
//! Mapping never validates; run `rules::validation` first. An absent DTO
//! field or an unpersisted record is reported as `InvalidArgument` rather
//! than producing a partially filled value.

use crate::dto::{CommandCreate, CommandRead, CommandUpdate};
use crate::errors::{CommandError, Result};
use crate::model::Command;
use crate::rules::{FIELD_COMMAND_LINE, FIELD_HOW_TO, FIELD_PLATFORM};

/// Build a new record from a create request; the id is left to the store
///
/// # Errors
/// `InvalidArgument` if any field of the DTO is absent.
pub fn to_command(dto: CommandCreate) -> Result<Command> {
    Ok(Command::new(
        require(dto.how_to, FIELD_HOW_TO)?,
        require(dto.platform, FIELD_PLATFORM)?,
        require(dto.command_line, FIELD_COMMAND_LINE)?,
    ))
}

/// Overwrite the content fields of an existing record in place
///
/// The id is never touched. On error the target is left unchanged.
///
/// # Errors
/// `InvalidArgument` if any field of the DTO is absent.
pub fn apply_update(dto: CommandUpdate, target: &mut Command) -> Result<()> {
    let how_to = require(dto.how_to, FIELD_HOW_TO)?;
    let platform = require(dto.platform, FIELD_PLATFORM)?;
    let command_line = require(dto.command_line, FIELD_COMMAND_LINE)?;

    target.how_to = how_to;
    target.platform = platform;
    target.command_line = command_line;
    Ok(())
}

/// Project a persisted record into its read shape
///
/// # Errors
/// `InvalidArgument` if the record has not been assigned an id yet.
pub fn to_read(command: &Command) -> Result<CommandRead> {
    let id = command.id.ok_or_else(|| {
        CommandError::invalid_argument("cannot map an unpersisted command to its read shape")
    })?;

    Ok(CommandRead {
        id,
        how_to: command.how_to.clone(),
        platform: command.platform.clone(),
        command_line: command.command_line.clone(),
    })
}

fn require(value: Option<String>, field: &str) -> Result<String> {
    value.ok_or_else(|| CommandError::invalid_argument(format!("field '{}' is absent", field)))
}
