use crate::defaults;
use crate::error::{NarratorError, Result};
use crate::segment::{MarkupConfig, TextKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub model: ModelConfig,
    pub speech: SpeechConfig,
    pub segmentation: SegmentationConfig,
    pub markup: MarkupConfig,
    pub fetch: FetchConfig,
}

/// Artifact storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Location used when an event carries no override.
    pub default_location: String,
}

/// Script rewriting model configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeechConfig {
    pub voice_id: String,
    pub words_per_minute: u32,
    pub output_format: String,
    pub text_type: TextKind,
    pub parallelism: usize,
}

/// Chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegmentationConfig {
    pub max_chars: usize,
    pub boundary_ratio: f64,
}

/// Source document fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            default_location: defaults::STORAGE_LOCATION.to_string(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_id: defaults::MODEL_ID.to_string(),
            max_tokens: defaults::MAX_TOKENS,
            temperature: defaults::TEMPERATURE,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            voice_id: defaults::VOICE_ID.to_string(),
            words_per_minute: defaults::WORDS_PER_MINUTE,
            output_format: defaults::OUTPUT_FORMAT.to_string(),
            text_type: TextKind::Plain,
            parallelism: defaults::SYNTHESIS_PARALLELISM,
        }
    }
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_chars: defaults::MAX_CHARS,
            boundary_ratio: defaults::BOUNDARY_RATIO,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::FETCH_TIMEOUT_SECS,
            user_agent: defaults::USER_AGENT.to_string(),
        }
    }
}

fn invalid(key: &str, message: impl Into<String>) -> NarratorError {
    NarratorError::ConfigInvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns `ConfigFileNotFound` if the file does not exist and an error
    /// if it contains invalid TOML. Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => NarratorError::ConfigFileNotFound {
                path: path.display().to_string(),
            },
            _ => NarratorError::Io(err),
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only a missing file falls back to defaults; invalid TOML is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(NarratorError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - NARRATOR_STORAGE_LOCATION → storage.default_location
    /// - NARRATOR_MODEL_ID → model.model_id
    /// - NARRATOR_VOICE_ID → speech.voice_id
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(location) = std::env::var("NARRATOR_STORAGE_LOCATION")
            && !location.is_empty()
        {
            self.storage.default_location = location;
        }

        if let Ok(model_id) = std::env::var("NARRATOR_MODEL_ID")
            && !model_id.is_empty()
        {
            self.model.model_id = model_id;
        }

        if let Ok(voice_id) = std::env::var("NARRATOR_VOICE_ID")
            && !voice_id.is_empty()
        {
            self.speech.voice_id = voice_id;
        }

        self
    }

    /// Check value ranges the stages rely on.
    pub fn validate(&self) -> Result<()> {
        if self.storage.default_location.trim().is_empty() {
            return Err(invalid("storage.default_location", "must not be empty"));
        }
        if self.model.model_id.trim().is_empty() {
            return Err(invalid("model.model_id", "must not be empty"));
        }
        if self.model.max_tokens == 0 {
            return Err(invalid("model.max_tokens", "must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&self.model.temperature) {
            return Err(invalid("model.temperature", "must be between 0 and 1"));
        }
        if self.speech.voice_id.trim().is_empty() {
            return Err(invalid("speech.voice_id", "must not be empty"));
        }
        if self.speech.words_per_minute == 0 {
            return Err(invalid("speech.words_per_minute", "must be greater than 0"));
        }
        if self.speech.parallelism == 0 {
            return Err(invalid("speech.parallelism", "must be at least 1"));
        }
        if self.segmentation.max_chars < defaults::MIN_MAX_CHARS {
            return Err(invalid(
                "segmentation.max_chars",
                format!("must be at least {}", defaults::MIN_MAX_CHARS),
            ));
        }
        let ratio = self.segmentation.boundary_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(invalid(
                "segmentation.boundary_ratio",
                "must be greater than 0 and at most 1",
            ));
        }
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/narrator/config.toml on Linux, or `None` when the
    /// platform has no config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("narrator").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to serialize tests that modify environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    // SAFETY: These helpers are only used in tests with ENV_LOCK held,
    // ensuring no concurrent access to environment variables.
    fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) }
    }

    fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) }
    }

    fn clear_narrator_env() {
        remove_env("NARRATOR_STORAGE_LOCATION");
        remove_env("NARRATOR_MODEL_ID");
        remove_env("NARRATOR_VOICE_ID");
    }

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        temp_file
    }

    #[test]
    fn test_default_config_has_correct_values() {
        let config = Config::default();

        assert_eq!(config.storage.default_location, "narrator-artifacts");

        assert_eq!(config.model.model_id, "us.amazon.nova-lite-v1:0");
        assert_eq!(config.model.max_tokens, 1400);
        assert_eq!(config.model.temperature, 0.5);

        assert_eq!(config.speech.voice_id, "Joanna");
        assert_eq!(config.speech.words_per_minute, 150);
        assert_eq!(config.speech.output_format, "mp3");
        assert_eq!(config.speech.text_type, TextKind::Plain);
        assert_eq!(config.speech.parallelism, 1);

        assert_eq!(config.segmentation.max_chars, 2500);
        assert_eq!(config.segmentation.boundary_ratio, 0.6);

        assert_eq!(config.markup.speech_rate, "medium");
        assert_eq!(config.markup.short_pause_ms, 350);
        assert_eq!(config.markup.long_pause_ms, 800);

        assert_eq!(config.fetch.timeout_secs, 20);
        assert_eq!(config.fetch.user_agent, "narrator-bot");
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp_file = write_temp(
            r#"
            [storage]
            default_location = "podcasts"

            [model]
            model_id = "anthropic.claude-3-haiku-20240307-v1:0"
            max_tokens = 2000
            temperature = 0.7

            [speech]
            voice_id = "Matthew"
            words_per_minute = 160
            output_format = "ogg_vorbis"
            text_type = "ssml"
            parallelism = 4

            [segmentation]
            max_chars = 1500
            boundary_ratio = 0.5

            [markup]
            speech_rate = "95%"
            short_pause_ms = 300
            long_pause_ms = 900

            [fetch]
            timeout_secs = 5
            user_agent = "test-agent"
        "#,
        );

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.storage.default_location, "podcasts");
        assert_eq!(
            config.model.model_id,
            "anthropic.claude-3-haiku-20240307-v1:0"
        );
        assert_eq!(config.model.max_tokens, 2000);
        assert_eq!(config.model.temperature, 0.7);
        assert_eq!(config.speech.voice_id, "Matthew");
        assert_eq!(config.speech.words_per_minute, 160);
        assert_eq!(config.speech.output_format, "ogg_vorbis");
        assert_eq!(config.speech.text_type, TextKind::Ssml);
        assert_eq!(config.speech.parallelism, 4);
        assert_eq!(config.segmentation.max_chars, 1500);
        assert_eq!(config.segmentation.boundary_ratio, 0.5);
        assert_eq!(config.markup.speech_rate, "95%");
        assert_eq!(config.markup.short_pause_ms, 300);
        assert_eq!(config.markup.long_pause_ms, 900);
        assert_eq!(config.fetch.timeout_secs, 5);
        assert_eq!(config.fetch.user_agent, "test-agent");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let temp_file = write_temp(
            r#"
            [speech]
            voice_id = "Amy"
        "#,
        );

        let config = Config::load(temp_file.path()).unwrap();

        // Only the voice should be overridden
        assert_eq!(config.speech.voice_id, "Amy");

        let mut expected = Config::default();
        expected.speech.voice_id = "Amy".to_string();
        assert_eq!(config, expected);
    }

    #[test]
    fn test_unknown_text_type_is_rejected() {
        let temp_file = write_temp(
            r#"
            [speech]
            text_type = "markdown"
        "#,
        );

        let result = Config::load(temp_file.path());
        assert!(matches!(result, Err(NarratorError::Config(_))));
    }

    #[test]
    fn test_env_override_model() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_narrator_env();

        set_env("NARRATOR_MODEL_ID", "us.anthropic.claude-3-5-sonnet");
        let config = Config::default().with_env_overrides();

        assert_eq!(config.model.model_id, "us.anthropic.claude-3-5-sonnet");
        assert_eq!(config.speech.voice_id, "Joanna"); // Not overridden

        clear_narrator_env();
    }

    #[test]
    fn test_env_override_all() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_narrator_env();

        set_env("NARRATOR_STORAGE_LOCATION", "my-bucket");
        set_env("NARRATOR_MODEL_ID", "amazon.nova-pro-v1:0");
        set_env("NARRATOR_VOICE_ID", "Brian");

        let config = Config::default().with_env_overrides();

        assert_eq!(config.storage.default_location, "my-bucket");
        assert_eq!(config.model.model_id, "amazon.nova-pro-v1:0");
        assert_eq!(config.speech.voice_id, "Brian");

        clear_narrator_env();
    }

    #[test]
    fn test_env_override_empty_string_ignored() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_narrator_env();

        set_env("NARRATOR_VOICE_ID", "");
        let config = Config::default().with_env_overrides();

        // Empty string should not override default
        assert_eq!(config.speech.voice_id, "Joanna");

        clear_narrator_env();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let temp_file = write_temp(
            r#"
            [speech
            voice_id = "broken
        "#,
        );

        let result = Config::load(temp_file.path());

        assert!(matches!(result, Err(NarratorError::Config(_))));
    }

    #[test]
    fn test_default_path_is_xdg_compliant() {
        let Some(path) = Config::default_path() else {
            return;
        };
        let path_str = path.to_string_lossy();

        assert!(path_str.contains("narrator"));
        assert!(path_str.ends_with("config.toml"));
    }

    #[test]
    fn test_load_or_default_returns_default_for_missing_file() {
        let missing_path = Path::new("/tmp/nonexistent_narrator_config_12345.toml");
        let config = Config::load_or_default(missing_path).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_reports_missing_file_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("narrator.toml");

        match Config::load(&missing) {
            Err(NarratorError::ConfigFileNotFound { path }) => {
                assert_eq!(path, missing.display().to_string());
            }
            other => panic!("Expected ConfigFileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_or_default_fails_on_invalid_toml() {
        let temp_file = write_temp("[speech\nvoice_id = ");

        // Invalid TOML is reported, not replaced by defaults
        assert!(Config::load_or_default(temp_file.path()).is_err());
    }

    #[test]
    fn test_validate_rejects_small_max_chars() {
        let mut config = Config::default();
        config.segmentation.max_chars = 99;

        match config.validate() {
            Err(NarratorError::ConfigInvalidValue { key, message }) => {
                assert_eq!(key, "segmentation.max_chars");
                assert_eq!(message, "must be at least 100");
            }
            other => panic!("Expected ConfigInvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let cases: Vec<(&str, Box<dyn Fn(&mut Config)>)> = vec![
            ("storage.default_location", Box::new(|c: &mut Config| c.storage.default_location = " ".into())),
            ("model.model_id", Box::new(|c: &mut Config| c.model.model_id = String::new())),
            ("model.max_tokens", Box::new(|c: &mut Config| c.model.max_tokens = 0)),
            ("model.temperature", Box::new(|c: &mut Config| c.model.temperature = 1.5)),
            ("speech.voice_id", Box::new(|c: &mut Config| c.speech.voice_id = String::new())),
            ("speech.words_per_minute", Box::new(|c: &mut Config| c.speech.words_per_minute = 0)),
            ("speech.parallelism", Box::new(|c: &mut Config| c.speech.parallelism = 0)),
            ("segmentation.boundary_ratio", Box::new(|c: &mut Config| c.segmentation.boundary_ratio = 0.0)),
            ("segmentation.boundary_ratio", Box::new(|c: &mut Config| c.segmentation.boundary_ratio = 1.2)),
        ];

        for (expected_key, mutate) in cases {
            let mut config = Config::default();
            mutate(&mut config);
            match config.validate() {
                Err(NarratorError::ConfigInvalidValue { key, .. }) => {
                    assert_eq!(key, expected_key)
                }
                other => panic!("Expected {} to be rejected, got {:?}", expected_key, other),
            }
        }
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let mut config = Config::default();
        config.speech.text_type = TextKind::Ssml;
        let serialized = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed, config);
    }
}
