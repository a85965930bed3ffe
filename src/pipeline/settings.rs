//! Values the stages read from configuration.

use crate::config::Config;
use crate::defaults;
use crate::model::InvocationParams;
use crate::segment::{MarkupConfig, SegmenterConfig, TextKind};

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    /// Storage location used when an event carries no override.
    pub storage_location: String,
    pub model_id: String,
    pub invocation: InvocationParams,
    /// Voice used when an event carries no `voice_id`.
    pub voice_id: String,
    pub words_per_minute: u32,
    pub output_format: String,
    pub text_kind: TextKind,
    /// Concurrent chunk requests during synthesis.
    pub parallelism: usize,
    pub segmenter: SegmenterConfig,
    pub markup: MarkupConfig,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            storage_location: defaults::STORAGE_LOCATION.to_string(),
            model_id: defaults::MODEL_ID.to_string(),
            invocation: InvocationParams::default(),
            voice_id: defaults::VOICE_ID.to_string(),
            words_per_minute: defaults::WORDS_PER_MINUTE,
            output_format: defaults::OUTPUT_FORMAT.to_string(),
            text_kind: TextKind::default(),
            parallelism: defaults::SYNTHESIS_PARALLELISM,
            segmenter: SegmenterConfig::default(),
            markup: MarkupConfig::default(),
        }
    }
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            storage_location: config.storage.default_location.clone(),
            model_id: config.model.model_id.clone(),
            invocation: InvocationParams {
                max_tokens: config.model.max_tokens,
                temperature: config.model.temperature,
            },
            voice_id: config.speech.voice_id.clone(),
            words_per_minute: config.speech.words_per_minute,
            output_format: config.speech.output_format.clone(),
            text_kind: config.speech.text_type,
            parallelism: config.speech.parallelism,
            segmenter: SegmenterConfig {
                max_chars: config.segmentation.max_chars,
                boundary_ratio: config.segmentation.boundary_ratio,
            },
            markup: config.markup.clone(),
        }
    }
}

/// Spoken duration estimate: `round(words / wpm * 60)` seconds.
pub fn estimate_duration_secs(text: &str, words_per_minute: u32) -> u64 {
    if words_per_minute == 0 {
        return 0;
    }
    let words = text.split_whitespace().count() as f64;
    (words / f64::from(words_per_minute) * 60.0).round() as u64
}
