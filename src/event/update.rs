//! Field deltas applied by [`PipelineEvent::with_updates`].

use crate::event::error::SchemaError;
use crate::event::{PipelineEvent, fields, normalize_string};

/// Named fields to replace on a pipeline event.
///
/// Only stage outputs and the storage location can change; the job id and the
/// caller-supplied fields are fixed when the event is first validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventUpdate {
    bucket: Option<String>,
    article_key: Option<String>,
    article_char_count: Option<u64>,
    script_key: Option<String>,
    script_metadata_key: Option<String>,
    audio_key: Option<String>,
    audio_estimated_duration_sec: Option<u64>,
}

impl EventUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    pub fn article(mut self, key: impl Into<String>, char_count: u64) -> Self {
        self.article_key = Some(key.into());
        self.article_char_count = Some(char_count);
        self
    }

    pub fn script(mut self, key: impl Into<String>, metadata_key: impl Into<String>) -> Self {
        self.script_key = Some(key.into());
        self.script_metadata_key = Some(metadata_key.into());
        self
    }

    pub fn audio(mut self, key: impl Into<String>, estimated_duration_sec: u64) -> Self {
        self.audio_key = Some(key.into());
        self.audio_estimated_duration_sec = Some(estimated_duration_sec);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply(self, mut event: PipelineEvent) -> Result<PipelineEvent, SchemaError> {
        if let Some(bucket) = self.bucket {
            event.bucket = Some(normalize_string(&bucket, fields::BUCKET)?);
        }
        if let Some(key) = self.article_key {
            event.article_key = Some(normalize_string(&key, fields::ARTICLE_KEY)?);
        }
        if let Some(count) = self.article_char_count {
            event.article_char_count = Some(count);
        }
        if let Some(key) = self.script_key {
            event.script_key = Some(normalize_string(&key, fields::SCRIPT_KEY)?);
        }
        if let Some(key) = self.script_metadata_key {
            event.script_metadata_key = Some(normalize_string(&key, fields::SCRIPT_METADATA_KEY)?);
        }
        if let Some(key) = self.audio_key {
            event.audio_key = Some(normalize_string(&key, fields::AUDIO_KEY)?);
        }
        if let Some(duration) = self.audio_estimated_duration_sec {
            event.audio_estimated_duration_sec = Some(duration);
        }
        Ok(event)
    }
}
