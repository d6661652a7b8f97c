//! Route handlers with boundary logging.
//!
//! ## Logging Ownership
//!
//! The engine owns lifecycle logging for requests:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success (including not-found and invalid outcomes)
//! - `log_op_error!` on failure
//!
//! Core and store use only `tracing::debug!()` for internal details.

#![allow(clippy::result_large_err)]

use std::time::Instant;

use commander_core::dto::decode_body;
use commander_core::rules::{validate_create, validate_update};
use commander_core::{
    log_op_end, log_op_error, log_op_start, mapper, CommandCreate, CommandError, CommandId,
    CommandRead, CommandRepo, CommandUpdate, Result,
};

use crate::commands::command_request::RequestOutcome;

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

fn finish<T>(op: &str, start: Instant, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            log_op_end!(op, duration_ms = elapsed_ms(start));
            Ok(value)
        }
        Err(e) => {
            log_op_error!(op, e.clone(), duration_ms = elapsed_ms(start));
            Err(e)
        }
    }
}

/// Every committed record in its read shape, ordered by id
///
/// # Errors
/// `Storage` if the store cannot be read.
pub fn list_commands(repo: &CommandRepo<'_>) -> Result<Vec<CommandRead>> {
    log_op_start!("list_commands");
    let start = Instant::now();

    let result: Result<Vec<CommandRead>> = repo
        .list_all()
        .and_then(|all| all.iter().map(mapper::to_read).collect());

    if let Ok(reads) = &result {
        tracing::debug!(result_len = reads.len(), "commands listed");
    }
    finish("list_commands", start, result)
}

/// One record in its read shape, or `None` when the id is unknown
///
/// # Errors
/// `Storage` if the store cannot be read.
pub fn get_command(repo: &mut CommandRepo<'_>, id: CommandId) -> Result<Option<CommandRead>> {
    log_op_start!("get_command", command_id = id);
    let start = Instant::now();

    let result = repo
        .get_by_id(id)
        .and_then(|found| found.map(|command| mapper::to_read(command)).transpose());

    finish("get_command", start, result)
}

/// Decode, validate and insert a new record
///
/// # Errors
/// `Storage` if the commit fails.
pub fn create_command(repo: &mut CommandRepo<'_>, body: &[u8]) -> Result<RequestOutcome> {
    log_op_start!("create_command");
    let start = Instant::now();

    let result = create_command_impl(repo, body);
    finish("create_command", start, result)
}

fn create_command_impl(repo: &mut CommandRepo<'_>, body: &[u8]) -> Result<RequestOutcome> {
    let dto: CommandCreate = match decode_body(body) {
        Ok(dto) => dto,
        Err(errors) => return Ok(RequestOutcome::Invalid(errors)),
    };
    if let Err(errors) = validate_create(&dto) {
        return Ok(RequestOutcome::Invalid(errors));
    }

    repo.create(mapper::to_command(dto)?)?;
    let created = repo
        .save()?
        .created
        .into_iter()
        .next()
        .ok_or_else(|| CommandError::storage("create_command", "no id assigned to new command"))?;

    tracing::debug!(command_id = ?created.id, "command created");
    Ok(RequestOutcome::Created(mapper::to_read(&created)?))
}

/// Replace the content of an existing record
///
/// The id is checked before the body is decoded, so an unknown id is
/// reported as not found whatever the body holds.
///
/// # Errors
/// `Storage` if the store cannot be read or the commit fails.
pub fn update_command(
    repo: &mut CommandRepo<'_>,
    id: CommandId,
    body: &[u8],
) -> Result<RequestOutcome> {
    log_op_start!("update_command", command_id = id);
    let start = Instant::now();

    let result = update_command_impl(repo, id, body);
    finish("update_command", start, result)
}

fn update_command_impl(
    repo: &mut CommandRepo<'_>,
    id: CommandId,
    body: &[u8],
) -> Result<RequestOutcome> {
    let Some(target) = repo.get_by_id(id)? else {
        return Ok(RequestOutcome::NotFound);
    };

    let dto: CommandUpdate = match decode_body(body) {
        Ok(dto) => dto,
        Err(errors) => return Ok(RequestOutcome::Invalid(errors)),
    };
    if let Err(errors) = validate_update(&dto) {
        return Ok(RequestOutcome::Invalid(errors));
    }

    mapper::apply_update(dto, target)?;
    repo.save()?;
    Ok(RequestOutcome::NoContent)
}

/// Remove an existing record
///
/// # Errors
/// `Storage` if the store cannot be read or the commit fails.
pub fn delete_command(repo: &mut CommandRepo<'_>, id: CommandId) -> Result<RequestOutcome> {
    log_op_start!("delete_command", command_id = id);
    let start = Instant::now();

    let result = delete_command_impl(repo, id);
    finish("delete_command", start, result)
}

fn delete_command_impl(repo: &mut CommandRepo<'_>, id: CommandId) -> Result<RequestOutcome> {
    let Some(found) = repo.get_by_id(id)? else {
        return Ok(RequestOutcome::NotFound);
    };

    let command = found.clone();
    repo.delete(&command)?;
    repo.save()?;
    Ok(RequestOutcome::NoContent)
}
