//! Error types for household domain validation and parsing.

use super::TaskId;
use thiserror::Error;

/// Errors returned while constructing or mutating household domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HouseholdDomainError {
    /// A required text field is empty after trimming.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A text field exceeds its persisted column width.
    #[error("{field} must be at most {max} characters, got {actual}")]
    FieldTooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Column width in characters.
        max: usize,
        /// Length of the rejected value in characters.
        actual: usize,
    },

    /// The email address is not plausibly addressable.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The digest time is not a 24-hour `HH:MM` value.
    #[error("invalid digest time '{0}', expected HH:MM")]
    InvalidDigestTime(String),

    /// The reminder lead time does not fit the persisted integer column.
    #[error("reminder lead time {0} days is out of range")]
    ReminderLeadOutOfRange(u32),

    /// A task was made its own parent.
    #[error("task {0} cannot be its own parent")]
    SelfParent(TaskId),

    /// A task was made to block itself.
    #[error("task {0} cannot block itself")]
    SelfDependency(TaskId),

    /// Linking the tasks would close a cycle in the parent chain or the
    /// blocking graph.
    #[error("linking task {task} to {related} would create a cycle")]
    CycleDetected {
        /// Task being linked.
        task: TaskId,
        /// Proposed parent or blocker.
        related: TaskId,
    },
}

/// Error returned while parsing an enumerated code read from storage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} code: {value}")]
pub struct ParseCodeError {
    /// Name of the enumeration being parsed.
    pub kind: &'static str,
    /// Rejected raw value.
    pub value: String,
}

impl ParseCodeError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Trims `value` and checks it against a column width.
pub(crate) fn bounded_text(
    field: &'static str,
    value: impl Into<String>,
    max: usize,
) -> Result<String, HouseholdDomainError> {
    let raw = value.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(HouseholdDomainError::EmptyField { field });
    }
    let actual = trimmed.chars().count();
    if actual > max {
        return Err(HouseholdDomainError::FieldTooLong { field, max, actual });
    }
    Ok(trimmed.to_owned())
}
