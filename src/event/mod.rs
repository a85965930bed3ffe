//! Pipeline event: the unit of state handed from one stage to the next.
//!
//! Events arrive as raw JSON payloads from whatever sequences the stages.
//! [`validate`] type-checks every known field, optionally checks the fields a
//! stage needs, and keeps any unrecognized keys so they survive the round
//! trip back out through [`PipelineEvent::to_payload`].

pub mod error;
pub mod stage;
mod update;

pub use error::SchemaError;
pub use stage::Stage;
pub use update::EventUpdate;

use crate::defaults;
use serde_json::{Map, Value};

/// Wire names of the known event fields.
pub mod fields {
    pub const JOB_ID: &str = "job_id";
    pub const SOURCE_URL: &str = "source_url";
    pub const TITLE: &str = "title";
    pub const STYLE: &str = "style";
    pub const VOICE_ID: &str = "voice_id";
    pub const BUCKET: &str = "bucket";
    pub const ARTICLE_KEY: &str = "article_s3_key";
    pub const ARTICLE_CHAR_COUNT: &str = "article_char_count";
    pub const SCRIPT_KEY: &str = "script_s3_key";
    pub const SCRIPT_METADATA_KEY: &str = "script_metadata_s3_key";
    pub const AUDIO_KEY: &str = "audio_s3_key";
    pub const AUDIO_DURATION_SEC: &str = "audio_estimated_duration_sec";

    /// Every known field, in validation order.
    pub const KNOWN: [&str; 12] = [
        JOB_ID,
        SOURCE_URL,
        TITLE,
        STYLE,
        VOICE_ID,
        BUCKET,
        ARTICLE_KEY,
        ARTICLE_CHAR_COUNT,
        SCRIPT_KEY,
        SCRIPT_METADATA_KEY,
        AUDIO_KEY,
        AUDIO_DURATION_SEC,
    ];

    pub fn is_known(name: &str) -> bool {
        KNOWN.contains(&name)
    }
}

/// Validated pipeline state.
///
/// Values are never mutated in place: [`PipelineEvent::with_updates`] returns a
/// new event, so the job id set at construction stays fixed for the job's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineEvent {
    job_id: Option<String>,
    source_url: Option<String>,
    title: Option<String>,
    style: String,
    voice_id: Option<String>,
    bucket: Option<String>,
    article_key: Option<String>,
    article_char_count: Option<u64>,
    script_key: Option<String>,
    script_metadata_key: Option<String>,
    audio_key: Option<String>,
    audio_estimated_duration_sec: Option<u64>,
    extras: Map<String, Value>,
}

/// Validate a raw payload, optionally against the fields a named stage requires.
///
/// Field-level checks run first, in [`fields::KNOWN`] order; the first violation
/// is returned. Stage requirements are checked only once every field is well-formed.
pub fn validate(raw: &Value, stage: Option<&str>) -> Result<PipelineEvent, SchemaError> {
    let event = PipelineEvent::from_payload(raw)?;
    if let Some(name) = stage {
        let stage: Stage = name.parse()?;
        event.check_stage(stage)?;
    }
    Ok(event)
}

impl PipelineEvent {
    /// Parse and type-check a payload without any stage requirement.
    pub fn from_payload(raw: &Value) -> Result<Self, SchemaError> {
        let obj = raw.as_object().ok_or(SchemaError::InvalidShape)?;

        let event = PipelineEvent {
            job_id: read_string(obj, fields::JOB_ID)?,
            source_url: read_string(obj, fields::SOURCE_URL)?,
            title: read_string(obj, fields::TITLE)?,
            style: read_string(obj, fields::STYLE)?
                .unwrap_or_else(|| defaults::STYLE.to_string()),
            voice_id: read_string(obj, fields::VOICE_ID)?,
            bucket: read_string(obj, fields::BUCKET)?,
            article_key: read_string(obj, fields::ARTICLE_KEY)?,
            article_char_count: read_count(obj, fields::ARTICLE_CHAR_COUNT)?,
            script_key: read_string(obj, fields::SCRIPT_KEY)?,
            script_metadata_key: read_string(obj, fields::SCRIPT_METADATA_KEY)?,
            audio_key: read_string(obj, fields::AUDIO_KEY)?,
            audio_estimated_duration_sec: read_count(obj, fields::AUDIO_DURATION_SEC)?,
            extras: obj
                .iter()
                .filter(|(key, _)| !fields::is_known(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        };
        Ok(event)
    }

    /// Check that every field `stage` needs is present.
    pub fn check_stage(&self, stage: Stage) -> Result<(), SchemaError> {
        let missing: Vec<&'static str> = stage
            .required_fields()
            .iter()
            .copied()
            .filter(|name| !self.has_field(name))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::MissingRequiredFields {
                stage: stage.as_str(),
                fields: missing,
            })
        }
    }

    /// Job id and source locator, if the event can enter the extract stage.
    pub fn require_extract(&self) -> Result<(&str, &str), SchemaError> {
        match (self.job_id.as_deref(), self.source_url.as_deref()) {
            (Some(job_id), Some(source_url)) => Ok((job_id, source_url)),
            _ => Err(self.missing_for(Stage::Extract)),
        }
    }

    /// Job id and article locator, if the event can enter the rewrite stage.
    pub fn require_rewrite(&self) -> Result<(&str, &str), SchemaError> {
        match (self.job_id.as_deref(), self.article_key.as_deref()) {
            (Some(job_id), Some(article_key)) => Ok((job_id, article_key)),
            _ => Err(self.missing_for(Stage::Rewrite)),
        }
    }

    /// Job id and script locator, if the event can enter the synthesize stage.
    pub fn require_synthesize(&self) -> Result<(&str, &str), SchemaError> {
        match (self.job_id.as_deref(), self.script_key.as_deref()) {
            (Some(job_id), Some(script_key)) => Ok((job_id, script_key)),
            _ => Err(self.missing_for(Stage::Synthesize)),
        }
    }

    fn missing_for(&self, stage: Stage) -> SchemaError {
        match self.check_stage(stage) {
            Err(error) => error,
            Ok(()) => SchemaError::MissingRequiredFields {
                stage: stage.as_str(),
                fields: stage.required_fields().to_vec(),
            },
        }
    }

    /// The event's storage location override, or `default` when it has none.
    pub fn storage_location<'a>(&'a self, default: &'a str) -> &'a str {
        self.bucket.as_deref().unwrap_or(default)
    }

    /// Return a new event with the fields in `update` replaced.
    ///
    /// `self` is left untouched. Replacement strings are held to the same
    /// rules as validated input.
    pub fn with_updates(&self, update: EventUpdate) -> Result<PipelineEvent, SchemaError> {
        update.apply(self.clone())
    }

    /// Serialize present fields merged over the preserved unknown ones.
    ///
    /// Absent fields are omitted rather than written as `null`.
    pub fn to_payload(&self) -> Value {
        let mut data = self.extras.clone();

        let strings = [
            (fields::JOB_ID, &self.job_id),
            (fields::SOURCE_URL, &self.source_url),
            (fields::TITLE, &self.title),
            (fields::VOICE_ID, &self.voice_id),
            (fields::BUCKET, &self.bucket),
            (fields::ARTICLE_KEY, &self.article_key),
            (fields::SCRIPT_KEY, &self.script_key),
            (fields::SCRIPT_METADATA_KEY, &self.script_metadata_key),
            (fields::AUDIO_KEY, &self.audio_key),
        ];
        for (name, value) in strings {
            if let Some(value) = value {
                data.insert(name.to_string(), Value::String(value.clone()));
            }
        }

        data.insert(
            fields::STYLE.to_string(),
            Value::String(self.style.clone()),
        );

        let counts = [
            (fields::ARTICLE_CHAR_COUNT, self.article_char_count),
            (fields::AUDIO_DURATION_SEC, self.audio_estimated_duration_sec),
        ];
        for (name, value) in counts {
            if let Some(value) = value {
                data.insert(name.to_string(), Value::from(value));
            }
        }

        Value::Object(data)
    }

    fn has_field(&self, name: &str) -> bool {
        match name {
            fields::JOB_ID => self.job_id.is_some(),
            fields::SOURCE_URL => self.source_url.is_some(),
            fields::TITLE => self.title.is_some(),
            fields::STYLE => true,
            fields::VOICE_ID => self.voice_id.is_some(),
            fields::BUCKET => self.bucket.is_some(),
            fields::ARTICLE_KEY => self.article_key.is_some(),
            fields::ARTICLE_CHAR_COUNT => self.article_char_count.is_some(),
            fields::SCRIPT_KEY => self.script_key.is_some(),
            fields::SCRIPT_METADATA_KEY => self.script_metadata_key.is_some(),
            fields::AUDIO_KEY => self.audio_key.is_some(),
            fields::AUDIO_DURATION_SEC => self.audio_estimated_duration_sec.is_some(),
            _ => self.extras.contains_key(name),
        }
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Style label; `"podcast"` unless the payload named one.
    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn voice_id(&self) -> Option<&str> {
        self.voice_id.as_deref()
    }

    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    pub fn article_key(&self) -> Option<&str> {
        self.article_key.as_deref()
    }

    pub fn article_char_count(&self) -> Option<u64> {
        self.article_char_count
    }

    pub fn script_key(&self) -> Option<&str> {
        self.script_key.as_deref()
    }

    pub fn script_metadata_key(&self) -> Option<&str> {
        self.script_metadata_key.as_deref()
    }

    pub fn audio_key(&self) -> Option<&str> {
        self.audio_key.as_deref()
    }

    pub fn audio_estimated_duration_sec(&self) -> Option<u64> {
        self.audio_estimated_duration_sec
    }

    /// Unrecognized payload keys, preserved verbatim.
    pub fn extras(&self) -> &Map<String, Value> {
        &self.extras
    }
}

/// Read an optional string field. `null` counts as absent; present strings
/// are trimmed and must not be empty.
fn read_string(obj: &Map<String, Value>, field: &'static str) -> Result<Option<String>, SchemaError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => normalize_string(s, field).map(Some),
        Some(_) => Err(SchemaError::InvalidType {
            field,
            expected: "a string",
        }),
    }
}

/// Read an optional non-negative integer field. Booleans and floats are rejected.
fn read_count(obj: &Map<String, Value>, field: &'static str) -> Result<Option<u64>, SchemaError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(value) = n.as_u64() {
                Ok(Some(value))
            } else if n.is_i64() {
                Err(SchemaError::Negative { field })
            } else {
                Err(SchemaError::InvalidType {
                    field,
                    expected: "an integer",
                })
            }
        }
        Some(_) => Err(SchemaError::InvalidType {
            field,
            expected: "an integer",
        }),
    }
}

pub(crate) fn normalize_string(value: &str, field: &'static str) -> Result<String, SchemaError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(SchemaError::EmptyString { field })
    } else {
        Ok(trimmed.to_string())
    }
}
