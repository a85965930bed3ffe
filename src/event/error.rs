//! Errors raised while validating pipeline events.

use thiserror::Error;

/// A pipeline event failed validation.
///
/// Each variant names the rule that was broken; only the first violation
/// found is reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("event must be a JSON object")]
    InvalidShape,

    #[error("event field '{field}' must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("event field '{field}' must not be empty")]
    EmptyString { field: &'static str },

    #[error("event field '{field}' must be >= 0")]
    Negative { field: &'static str },

    #[error("event for stage '{stage}' is missing required fields: {}", fields.join(", "))]
    MissingRequiredFields {
        stage: &'static str,
        fields: Vec<&'static str>,
    },

    #[error("unsupported pipeline stage: {stage}")]
    UnsupportedStage { stage: String },
}

impl SchemaError {
    /// Name of the offending field, when the error is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            SchemaError::InvalidType { field, .. }
            | SchemaError::EmptyString { field }
            | SchemaError::Negative { field } => Some(field),
            _ => None,
        }
    }
}
