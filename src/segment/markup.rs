//! SSML rendering for synthesis chunks.

use crate::defaults;
use crate::segment::error::SegmentationError;
use serde::{Deserialize, Serialize};

/// How a chunk is submitted to the speech provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextKind {
    #[default]
    Plain,
    Ssml,
}

impl TextKind {
    /// Content type declared to the provider alongside the body.
    pub fn content_type(self) -> &'static str {
        match self {
            TextKind::Plain => "text",
            TextKind::Ssml => "ssml",
        }
    }
}

/// Ready-to-send synthesis input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechText {
    pub body: String,
    pub kind: TextKind,
}

/// Pacing applied when rendering SSML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Prosody rate wrapped around the whole chunk (e.g. "medium", "95%").
    pub speech_rate: String,
    /// Pause for a single line break.
    pub short_pause_ms: u32,
    /// Pause for a paragraph break.
    pub long_pause_ms: u32,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            speech_rate: defaults::SPEECH_RATE.to_string(),
            short_pause_ms: defaults::SHORT_PAUSE_MS,
            long_pause_ms: defaults::LONG_PAUSE_MS,
        }
    }
}

/// Render a chunk as SSML with default pacing.
pub fn to_markup(chunk: &str) -> Result<String, SegmentationError> {
    to_markup_with(chunk, &MarkupConfig::default())
}

/// Render a chunk as SSML.
///
/// Markup-significant characters are escaped first. A run of two or more
/// newlines becomes the long pause, a lone newline the short pause, and the
/// result is wrapped in `<prosody>` inside `<speak>`.
pub fn to_markup_with(chunk: &str, config: &MarkupConfig) -> Result<String, SegmentationError> {
    let escaped = escape(chunk);
    let escaped = escaped.trim();
    if escaped.is_empty() {
        return Err(SegmentationError::EmptyChunk);
    }

    let short_pause = format!("<break time=\"{}ms\"/>", config.short_pause_ms);
    let long_pause = format!("<break time=\"{}ms\"/>", config.long_pause_ms);

    let mut body = String::with_capacity(escaped.len() + 64);
    let mut chars = escaped.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\n' && c != '\r' {
            body.push(c);
            continue;
        }

        // Swallow the whole whitespace run, counting the line breaks in it.
        let mut newlines = usize::from(c == '\n');
        while let Some(&next) = chars.peek() {
            if !next.is_whitespace() {
                break;
            }
            if next == '\n' {
                newlines += 1;
            }
            chars.next();
        }

        let kept = body.trim_end().len();
        body.truncate(kept);
        body.push_str(if newlines >= 2 { &long_pause } else { &short_pause });
    }

    Ok(format!(
        "<speak><prosody rate=\"{}\">{}</prosody></speak>",
        escape(&config.speech_rate),
        body
    ))
}

/// Prepare a chunk for submission in the requested mode.
pub fn render(
    chunk: &str,
    kind: TextKind,
    config: &MarkupConfig,
) -> Result<SpeechText, SegmentationError> {
    let body = match kind {
        TextKind::Plain => {
            let trimmed = chunk.trim();
            if trimmed.is_empty() {
                return Err(SegmentationError::EmptyChunk);
            }
            trimmed.to_string()
        }
        TextKind::Ssml => to_markup_with(chunk, config)?,
    };
    Ok(SpeechText { body, kind })
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
