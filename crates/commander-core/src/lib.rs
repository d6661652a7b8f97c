//! Commander Core - resource management kernel for Command records
//!
//! This crate provides the pieces every request path is built from:
//! - The `Command` record and its DTO projections
//! - Explicit mapping between DTOs and records
//! - Field validation collecting every violation
//! - The `RecordStore` seam with an in-memory implementation
//! - `CommandRepo`, a request-scoped unit of work over a `RecordStore`
//! - The error taxonomy and the structured logging facility

pub mod dto;
pub mod errors;
pub mod logging_facility;
pub mod mapper;
pub mod model;
pub mod ops;
pub mod rules;

// Re-export commonly used types
pub use dto::{CommandCreate, CommandRead, CommandUpdate};
pub use errors::{CommandError, ExError, ExErrorKind, Result};
pub use model::{Command, CommandId};
pub use ops::{Change, CommandRepo, MemoryStore, RecordStore, SaveReport};
pub use rules::validation::{ValidationErrors, Violation};
