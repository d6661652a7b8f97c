//! Commander Engine - request orchestration
//!
//! Turns one HTTP-level request into a unit of work over a `RecordStore`:
//! decode, validate, map, stage, save, and report the outcome.

pub mod commands;

pub use commands::command_request::{apply_request, CommandRequest, RequestOutcome};
