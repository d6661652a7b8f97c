//! Command orchestration layer.
//!
//! `command_request` is the single entry point; `handlers` holds one
//! function per route.

pub mod command_request;
pub mod handlers;
