use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{FIELD_COMMAND_LINE, FIELD_HOW_TO, FIELD_PLATFORM, PLATFORM_MAX_LEN};
use crate::dto::{CommandCreate, CommandUpdate};

/// A single rule broken by a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    /// The field is absent or null
    Required,
    /// The field is present but empty or whitespace-only
    Empty,
    /// The field is longer than its bound
    MaxLength,
    /// The request body could not be decoded at all
    Malformed,
}

impl Violation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Violation::Required => "required",
            Violation::Empty => "empty",
            Violation::MaxLength => "max_length",
            Violation::Malformed => "malformed",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name to violated rules, serialized as `{"platform": ["max_length"]}`
///
/// Field order is deterministic (sorted by wire name) so responses and test
/// assertions are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, BTreeSet<Violation>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map holding one violation
    pub fn single(field: impl Into<String>, violation: Violation) -> Self {
        let mut errors = Self::new();
        errors.add(field, violation);
        errors
    }

    /// Record a violation for a field
    pub fn add(&mut self, field: impl Into<String>, violation: Violation) {
        self.0.entry(field.into()).or_default().insert(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if a field has any violation
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Get the violations recorded for a field
    pub fn violations(&self, field: &str) -> Option<&BTreeSet<Violation>> {
        self.0.get(field)
    }

    /// Names of every field with a violation, in sorted order
    pub fn field_names(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    /// `Ok(())` when nothing was recorded, otherwise the map itself
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, violations) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            let rules: Vec<&str> = violations.iter().map(Violation::as_str).collect();
            write!(f, "{}: {}", field, rules.join(", "))?;
        }
        Ok(())
    }
}

/// Validate a create request
///
/// # Errors
/// Returns every violation found across all three fields.
pub fn validate_create(dto: &CommandCreate) -> Result<(), ValidationErrors> {
    validate_fields(
        dto.how_to.as_deref(),
        dto.platform.as_deref(),
        dto.command_line.as_deref(),
    )
}

/// Validate an update request
///
/// # Errors
/// Returns every violation found across all three fields.
pub fn validate_update(dto: &CommandUpdate) -> Result<(), ValidationErrors> {
    validate_fields(
        dto.how_to.as_deref(),
        dto.platform.as_deref(),
        dto.command_line.as_deref(),
    )
}

fn validate_fields(
    how_to: Option<&str>,
    platform: Option<&str>,
    command_line: Option<&str>,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    check_required(&mut errors, FIELD_HOW_TO, how_to);
    check_required(&mut errors, FIELD_PLATFORM, platform);
    check_required(&mut errors, FIELD_COMMAND_LINE, command_line);

    if let Some(platform) = platform {
        if platform.chars().count() > PLATFORM_MAX_LEN {
            errors.add(FIELD_PLATFORM, Violation::MaxLength);
        }
    }

    errors.into_result()
}

fn check_required(errors: &mut ValidationErrors, field: &str, value: Option<&str>) {
    match value {
        None => errors.add(field, Violation::Required),
        Some(v) if v.trim().is_empty() => errors.add(field, Violation::Empty),
        Some(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(
        how_to: Option<&str>,
        platform: Option<&str>,
        command_line: Option<&str>,
    ) -> CommandCreate {
        CommandCreate {
            how_to: how_to.map(str::to_string),
            platform: platform.map(str::to_string),
            command_line: command_line.map(str::to_string),
        }
    }

    #[test]
    fn test_valid_create_passes() {
        let dto = create(Some("list files"), Some("unix"), Some("ls -la"));
        assert!(validate_create(&dto).is_ok());
    }

    #[test]
    fn test_collects_all_violations() {
        let dto = create(None, Some("windows"), Some("   "));
        let errors = validate_create(&dto).unwrap_err();

        assert_eq!(errors.len(), 3);
        assert!(errors.violations(FIELD_HOW_TO).unwrap().contains(&Violation::Required));
        assert!(errors.violations(FIELD_PLATFORM).unwrap().contains(&Violation::MaxLength));
        assert!(errors.violations(FIELD_COMMAND_LINE).unwrap().contains(&Violation::Empty));
    }

    #[test]
    fn test_platform_length_counts_characters() {
        // five characters, more than five bytes
        let dto = create(Some("list"), Some("ünïx5"), Some("ls"));
        assert!(validate_create(&dto).is_ok());
    }

    #[test]
    fn test_serializes_as_field_map() {
        let errors = ValidationErrors::single(FIELD_PLATFORM, Violation::MaxLength);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "platform": ["max_length"] }));
    }

    #[test]
    fn test_display_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.add(FIELD_PLATFORM, Violation::Empty);
        errors.add(FIELD_HOW_TO, Violation::Required);

        assert_eq!(errors.to_string(), "howTo: required; platform: empty");
    }
}
