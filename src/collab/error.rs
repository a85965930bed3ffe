//! Errors reported by external collaborators.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("URL must start with http:// or https://: {url}")]
    InvalidUrl { url: String },

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("No readable text found in document")]
    NoReadableContent,

    #[error("Artifact store error for {location}/{key}: {message}")]
    Store {
        location: String,
        key: String,
        message: String,
    },

    #[error("Artifact not found: {location}/{key}")]
    NotFound { location: String, key: String },

    #[error("Model provider error: {message}")]
    Model { message: String },

    #[error("Speech synthesis failed: {message}")]
    Synthesis { message: String },
}

impl CollaboratorError {
    pub(crate) fn store(location: &str, key: &str, message: impl ToString) -> Self {
        CollaboratorError::Store {
            location: location.to_string(),
            key: key.to_string(),
            message: message.to_string(),
        }
    }
}
