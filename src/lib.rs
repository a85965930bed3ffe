//! narrator - Turn web articles into narrated audio
//!
//! Three stages (extract, rewrite, synthesize) pass a JSON event between
//! them; storage, model and speech services sit behind traits.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod collab;
pub mod config;
pub mod defaults;
pub mod error;
pub mod event;
pub mod model;
pub mod pipeline;
pub mod segment;

// Collaborator seams
pub use collab::{
    ArtifactStore, ContentFetcher, LanguageModelProvider, SpeechRequest, SpeechSynthesisProvider,
    TextExtractor,
};

// Event contract
pub use event::{EventUpdate, PipelineEvent, SchemaError, Stage, validate};

// Stages
pub use pipeline::{Collaborators, LocalRunner, Pipeline, PipelineSettings};

// Model dispatch
pub use model::{ModelFamily, ModelRegistry};

// Segmentation
pub use segment::{Segmenter, TextKind};

// Error handling
pub use error::{NarratorError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
