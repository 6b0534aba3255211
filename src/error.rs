//! Error types for the runbook data model

use thiserror::Error;
use uuid::Uuid;

/// Errors produced by model operations.
///
/// Identifier lookups that fail surface as the `*NotFound` variants so
/// callers can treat them as reported no-ops. Decode failures must be
/// propagated: silently discarding stored field definitions is never
/// acceptable.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No step with this id exists in the collection
    #[error("step {0} not found")]
    StepNotFound(Uuid),

    /// No field with this id exists in the field list
    #[error("field {0} not found")]
    FieldNotFound(Uuid),

    /// Option edits only apply to select fields carrying an options container
    #[error("field {0} is not a select field")]
    NotASelectField(Uuid),

    /// Option index outside the field's options list
    #[error("option index {index} out of range for field {field}")]
    OptionOutOfRange { field: Uuid, index: usize },

    /// The field schema has no attribute with this key
    #[error("unknown field attribute '{0}'")]
    UnknownAttribute(String),

    /// The operation applies to a different step type
    #[error("step {id} is not a {expected} step")]
    WrongStepType { id: Uuid, expected: &'static str },

    /// Stored field-list content is not a valid field array
    #[error("malformed field list: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ModelError {
    /// Check whether this error is a failed identifier lookup
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ModelError::StepNotFound(_) | ModelError::FieldNotFound(_)
        )
    }
}
