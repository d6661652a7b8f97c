//! External representations of a Command
//!
//! Create and update bodies keep every field optional so that a missing
//! field reaches the validator instead of failing in the JSON decoder.
//! Unknown JSON fields are ignored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::model::CommandId;
use crate::rules::validation::{ValidationErrors, Violation};
use crate::rules::FIELD_BODY;

/// Body of `POST /api/v1/commands`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandCreate {
    pub how_to: Option<String>,
    pub platform: Option<String>,
    pub command_line: Option<String>,
}

/// Body of `PUT /api/v1/commands/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandUpdate {
    pub how_to: Option<String>,
    pub platform: Option<String>,
    pub command_line: Option<String>,
}

/// Response shape of every read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRead {
    pub id: CommandId,
    pub how_to: String,
    pub platform: String,
    pub command_line: String,
}

impl CommandCreate {
    pub fn new(
        how_to: impl Into<String>,
        platform: impl Into<String>,
        command_line: impl Into<String>,
    ) -> Self {
        Self {
            how_to: Some(how_to.into()),
            platform: Some(platform.into()),
            command_line: Some(command_line.into()),
        }
    }
}

impl CommandUpdate {
    pub fn new(
        how_to: impl Into<String>,
        platform: impl Into<String>,
        command_line: impl Into<String>,
    ) -> Self {
        Self {
            how_to: Some(how_to.into()),
            platform: Some(platform.into()),
            command_line: Some(command_line.into()),
        }
    }
}

/// Decode a request body into a DTO
///
/// # Errors
/// Returns a violation map naming `body` when the bytes are not a JSON
/// object of the expected shape (including an empty body).
pub fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ValidationErrors> {
    serde_json::from_slice(bytes).map_err(|err| {
        tracing::debug!(error = %err, "request body rejected");
        ValidationErrors::single(FIELD_BODY, Violation::Malformed)
    })
}
