//! Core capability errors (validation of indices, fields, and edits).
//!
//! These are domain refusals, raised before any document is touched.

use thiserror::Error;

use super::FieldName;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoreError {
    #[error("contact index {index} out of range (0..{len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("there is no field `{name}`; try one of [{}]", FieldName::names().join(", "))]
    UnknownField { name: String },

    #[error("exactly one contact must be selected for edit, {count} matched")]
    EditTargetCount { count: usize },

    #[error("contact uuid is immutable (was {expected}, edited to {got})")]
    UuidChanged { expected: String, got: String },

    #[error("validation failed for field {field}: {reason}")]
    Validation { field: String, reason: String },
}

pub fn validation_error(field: impl Into<String>, reason: impl Into<String>) -> CoreError {
    CoreError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}
