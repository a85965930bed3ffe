//! Default configuration constants for narrator.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

/// Default style label embedded in the rewrite prompt.
pub const STYLE: &str = "podcast";

/// Default storage location when neither the event nor the environment names one.
pub const STORAGE_LOCATION: &str = "narrator-artifacts";

/// Default language model identifier.
///
/// The region-qualified form routes to the same family as the bare one.
pub const MODEL_ID: &str = "us.amazon.nova-lite-v1:0";

/// Default token budget for a single script rewrite.
pub const MAX_TOKENS: u32 = 1400;

/// Default sampling temperature for the rewrite.
pub const TEMPERATURE: f32 = 0.5;

/// Default speech synthesis voice.
pub const VOICE_ID: &str = "Joanna";

/// Speaking rate used to estimate audio duration from a script's word count.
///
/// 150 words per minute is a typical conversational narration pace.
pub const WORDS_PER_MINUTE: u32 = 150;

/// Default synthesized audio format.
pub const OUTPUT_FORMAT: &str = "mp3";

/// Default number of chunk synthesis requests in flight at once.
pub const SYNTHESIS_PARALLELISM: usize = 1;

/// Default maximum characters per synthesis chunk.
///
/// Speech providers commonly cap a request at 3000 characters including markup;
/// 2500 leaves room for the SSML envelope and pause directives.
pub const MAX_CHARS: usize = 2500;

/// Smallest accepted chunk limit.
///
/// Anything smaller cannot hold a meaningful sentence fragment.
pub const MIN_MAX_CHARS: usize = 100;

/// Fraction of the window a boundary must reach before it is accepted.
///
/// Boundaries found earlier than this are discarded and the window is cut
/// hard at its full length instead.
pub const BOUNDARY_RATIO: f64 = 0.6;

const _: () = assert!(BOUNDARY_RATIO > 0.0 && BOUNDARY_RATIO <= 1.0);
const _: () = assert!(MIN_MAX_CHARS <= MAX_CHARS);

/// Default SSML prosody rate wrapped around each chunk.
pub const SPEECH_RATE: &str = "medium";

/// Pause inserted for a single line break, in milliseconds.
pub const SHORT_PAUSE_MS: u32 = 350;

/// Pause inserted for a paragraph break (two or more newlines), in milliseconds.
pub const LONG_PAUSE_MS: u32 = 800;

/// Timeout for fetching a source document, in seconds.
pub const FETCH_TIMEOUT_SECS: u64 = 20;

/// User agent sent when fetching source documents.
pub const USER_AGENT: &str = "narrator-bot";

/// Map a synthesis output format to the content type stored with the audio.
pub fn audio_content_type(format: &str) -> &'static str {
    match format {
        "mp3" => "audio/mpeg",
        "ogg_vorbis" => "audio/ogg",
        "pcm" => "audio/pcm",
        _ => "application/octet-stream",
    }
}

/// File extension used for the stored audio artifact.
pub fn audio_extension(format: &str) -> &str {
    match format {
        "ogg_vorbis" => "ogg",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_content_type_covers_known_formats() {
        assert_eq!(audio_content_type("mp3"), "audio/mpeg");
        assert_eq!(audio_content_type("ogg_vorbis"), "audio/ogg");
        assert_eq!(audio_content_type("pcm"), "audio/pcm");
        assert_eq!(audio_content_type("flac"), "application/octet-stream");
    }

    #[test]
    fn audio_extension_shortens_ogg_vorbis() {
        assert_eq!(audio_extension("ogg_vorbis"), "ogg");
        assert_eq!(audio_extension("mp3"), "mp3");
    }
}
