//! Error types for narrator.

use crate::collab::CollaboratorError;
use crate::event::SchemaError;
use crate::model::DispatchError;
use crate::segment::SegmentationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NarratorError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Module errors keep their own wording
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Segmentation(#[from] SegmentationError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, NarratorError>;
