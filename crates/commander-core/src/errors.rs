use commander_core_types::{RequestId, TraceId};
use thiserror::Error;

use crate::model::CommandId;
use crate::rules::validation::ValidationErrors;

/// Result type alias using CommandError
pub type Result<T> = std::result::Result<T, CommandError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used in log events and in the
/// body of server-error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// Field-level, user-correctable input problem
    ValidationFailure,
    /// No record with the requested id
    NotFound,
    /// Caller contract violation inside the core (a defect)
    InvalidArgument,
    /// Store unreachable or write rejected
    StorageFailure,
    /// Anything the layers above cannot classify
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::ValidationFailure => "ERR_VALIDATION_FAILURE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidArgument => "ERR_INVALID_ARGUMENT",
            ExErrorKind::StorageFailure => "ERR_STORAGE_FAILURE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus the context needed to correlate an error
/// with the request and operation that produced it.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add trace ID context
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for Command operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    /// One or more DTO fields broke a validation rule
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// No Command with this id exists
    #[error("Command not found: {id}")]
    NotFound { id: CommandId },

    /// The core was called in a way its contract forbids
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The record store failed to read or commit
    #[error("Storage failure in {op}: {message}")]
    Storage { op: String, message: String },
}

impl CommandError {
    /// Build an `InvalidArgument` error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        CommandError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Build a `Storage` error for the given store operation
    pub fn storage(op: impl Into<String>, message: impl Into<String>) -> Self {
        CommandError::Storage {
            op: op.into(),
            message: message.into(),
        }
    }

    /// Get the facility kind for this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            CommandError::Validation(_) => ExErrorKind::ValidationFailure,
            CommandError::NotFound { .. } => ExErrorKind::NotFound,
            CommandError::InvalidArgument { .. } => ExErrorKind::InvalidArgument,
            CommandError::Storage { .. } => ExErrorKind::StorageFailure,
        }
    }
}

impl From<CommandError> for ExError {
    fn from(err: CommandError) -> Self {
        let kind = err.kind();
        match err {
            CommandError::Validation(errors) => ExError::new(kind)
                .with_op("validate")
                .with_message(format!("Invalid fields: {}", errors.field_names().join(", "))),

            CommandError::NotFound { id } => ExError::new(kind)
                .with_entity_id(id.to_string())
                .with_message("Command not found"),

            CommandError::InvalidArgument { reason } => ExError::new(kind).with_message(reason),

            CommandError::Storage { op, message } => {
                ExError::new(kind).with_op(op).with_message(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code_and_context() {
        let err = ExError::new(ExErrorKind::StorageFailure)
            .with_op("commit")
            .with_message("disk full")
            .with_entity_id("3");

        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_STORAGE_FAILURE]"));
        assert!(rendered.contains("in operation 'commit'"));
        assert!(rendered.contains("disk full"));
        assert!(rendered.contains("(entity_id: 3)"));
    }

    #[test]
    fn test_storage_helper_keeps_op() {
        let err = CommandError::storage("scan", "no such table: commands");
        assert_eq!(
            err,
            CommandError::Storage {
                op: "scan".to_string(),
                message: "no such table: commands".to_string()
            }
        );
        assert_eq!(err.kind(), ExErrorKind::StorageFailure);
    }
}
