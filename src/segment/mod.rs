//! Segmentation engine: speech-safe chunks and their SSML rendering.

pub mod chunker;
pub mod error;
pub mod markup;

pub use chunker::{Segmenter, SegmenterConfig, segment};
pub use error::SegmentationError;
pub use markup::{MarkupConfig, SpeechText, TextKind, render, to_markup, to_markup_with};
