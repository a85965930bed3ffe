//! Bounded-length text segmentation for speech synthesis.
//!
//! Text is consumed window by window. Each window is cut at the strongest
//! sentence-like boundary that still leaves a reasonably full chunk:
//! - newline
//! - sentence end (". ", "! ", "? ")
//! - clause break ("; ", ", ")
//! - plain space
//!
//! If no boundary reaches the configured ratio of the window, the window is cut
//! at its full length. Only whitespace between chunks is ever dropped.

use crate::defaults;
use crate::segment::error::SegmentationError;

/// A boundary marker and how many of its bytes stay with the chunk before the cut.
struct Boundary {
    marker: &'static str,
    keep: usize,
}

/// Boundaries in priority order.
const BOUNDARIES: [Boundary; 7] = [
    Boundary { marker: "\n", keep: 0 },
    Boundary { marker: ". ", keep: 1 },
    Boundary { marker: "! ", keep: 1 },
    Boundary { marker: "? ", keep: 1 },
    Boundary { marker: "; ", keep: 1 },
    Boundary { marker: ", ", keep: 1 },
    Boundary { marker: " ", keep: 0 },
];

/// Configuration for the segmenter.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmenterConfig {
    /// Maximum characters per chunk (default: 2500).
    pub max_chars: usize,
    /// Fraction of `max_chars` a boundary must reach to be used (default: 0.6).
    pub boundary_ratio: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_chars: defaults::MAX_CHARS,
            boundary_ratio: defaults::BOUNDARY_RATIO,
        }
    }
}

/// Splits text into chunks a speech provider accepts in one request.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    config: SegmenterConfig,
}

/// Split `text` into chunks of at most `max_chars` characters using the default ratio.
pub fn segment(text: &str, max_chars: usize) -> Result<Vec<String>, SegmentationError> {
    Segmenter::with_config(SegmenterConfig {
        max_chars,
        ..SegmenterConfig::default()
    })
    .split(text)
}

impl Segmenter {
    /// Creates a segmenter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a segmenter with custom configuration.
    pub fn with_config(config: SegmenterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Split `text` into ordered chunks.
    ///
    /// Every chunk is trimmed, non-empty and at most `max_chars` characters long.
    /// Concatenating the chunks reproduces the trimmed input up to the
    /// whitespace consumed at each cut.
    pub fn split(&self, text: &str) -> Result<Vec<String>, SegmentationError> {
        let cleaned = text.trim();
        if cleaned.is_empty() {
            return Err(SegmentationError::EmptyInput);
        }

        let max_chars = self.config.max_chars;
        if max_chars < defaults::MIN_MAX_CHARS {
            return Err(SegmentationError::InvalidLimit {
                max_chars,
                min: defaults::MIN_MAX_CHARS,
            });
        }

        let ratio = self.config.boundary_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(SegmentationError::InvalidRatio { ratio });
        }

        // Shortest chunk a boundary cut may produce.
        let floor = ((max_chars as f64 * ratio) as usize).max(1);

        // Every cut but the last consumes at least `floor` characters.
        let total_chars = cleaned.chars().count();
        let max_iterations = total_chars.div_ceil(floor) + 1;

        let mut chunks = Vec::new();
        let mut remaining = cleaned;
        let mut consumed = 0usize;

        while !remaining.is_empty() {
            if chunks.len() >= max_iterations {
                return Err(SegmentationError::DegenerateChunk { offset: consumed });
            }

            let Some(window_end) = byte_offset(remaining, max_chars) else {
                chunks.push(remaining.to_string());
                break;
            };

            let window = &remaining[..window_end];
            let cut = find_cut(window, floor).unwrap_or(window_end);

            let chunk = remaining[..cut].trim_end();
            if chunk.is_empty() {
                return Err(SegmentationError::DegenerateChunk { offset: consumed });
            }
            chunks.push(chunk.to_string());

            let rest = remaining[cut..].trim_start();
            consumed += remaining.len() - rest.len();
            remaining = rest;
        }

        Ok(chunks)
    }
}

/// Byte offset just past the first `chars` characters, or `None` if `text` is
/// no longer than that.
fn byte_offset(text: &str, chars: usize) -> Option<usize> {
    text.char_indices().nth(chars).map(|(idx, _)| idx)
}

/// Byte position to cut `window` at, or `None` when no boundary clears `floor`.
fn find_cut(window: &str, floor: usize) -> Option<usize> {
    BOUNDARIES.iter().find_map(|boundary| {
        let cut = window.rfind(boundary.marker)? + boundary.keep;
        (window[..cut].chars().count() >= floor).then_some(cut)
    })
}
