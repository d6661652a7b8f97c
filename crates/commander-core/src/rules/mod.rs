pub mod validation;

pub use validation::{validate_create, validate_update, ValidationErrors, Violation};

/// Longest accepted `platform` tag, in characters
pub const PLATFORM_MAX_LEN: usize = 5;

// Wire names used as keys of the violation map
pub const FIELD_HOW_TO: &str = "howTo";
pub const FIELD_PLATFORM: &str = "platform";
pub const FIELD_COMMAND_LINE: &str = "commandLine";
pub const FIELD_BODY: &str = "body";
