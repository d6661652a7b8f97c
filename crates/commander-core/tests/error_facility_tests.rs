use commander_core::errors::{CommandError, ExError, ExErrorKind};
use commander_core::rules::FIELD_PLATFORM;
use commander_core::{ValidationErrors, Violation};

#[test]
fn test_not_found_verifiable_by_kind() {
    let ex_err: ExError = CommandError::NotFound { id: 999 }.into();

    assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(ex_err.code(), "ERR_NOT_FOUND");
    assert_eq!(ex_err.entity_id(), Some("999"));
}

#[test]
fn test_storage_failure_keeps_op() {
    let ex_err: ExError = CommandError::storage("commit", "database is locked").into();

    assert_eq!(ex_err.kind(), ExErrorKind::StorageFailure);
    assert_eq!(ex_err.code(), "ERR_STORAGE_FAILURE");
    assert_eq!(ex_err.op(), Some("commit"));
    assert_eq!(ex_err.message(), "database is locked");
}

#[test]
fn test_validation_failure_lists_fields() {
    let errors = ValidationErrors::single(FIELD_PLATFORM, Violation::MaxLength);
    let ex_err: ExError = CommandError::Validation(errors).into();

    assert_eq!(ex_err.kind(), ExErrorKind::ValidationFailure);
    assert!(ex_err.message().contains("platform"));
}

#[test]
fn test_invalid_argument_is_its_own_kind() {
    let ex_err: ExError = CommandError::invalid_argument("null record").into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidArgument);
    assert_ne!(ex_err.kind(), ExErrorKind::StorageFailure);
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::ValidationFailure, "ERR_VALIDATION_FAILURE"),
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::InvalidArgument, "ERR_INVALID_ARGUMENT"),
        (ExErrorKind::StorageFailure, "ERR_STORAGE_FAILURE"),
        (ExErrorKind::Internal, "ERR_INTERNAL"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}
