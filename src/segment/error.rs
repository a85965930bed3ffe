//! Segmentation error types.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentationError {
    #[error("Input text is empty")]
    EmptyInput,

    #[error("max_chars must be at least {min}, got {max_chars}")]
    InvalidLimit { max_chars: usize, min: usize },

    #[error("boundary ratio must be within (0, 1], got {ratio}")]
    InvalidRatio { ratio: f64 },

    #[error("Segmentation produced an empty chunk at character {offset}")]
    DegenerateChunk { offset: usize },

    #[error("Chunk is empty after escaping")]
    EmptyChunk,
}
