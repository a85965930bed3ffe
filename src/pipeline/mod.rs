//! Stage orchestration: extract, rewrite, synthesize.

pub mod keys;
pub mod runner;
pub mod settings;
pub mod stages;
pub mod synthesis;

pub use runner::LocalRunner;
pub use settings::{PipelineSettings, estimate_duration_secs};
pub use stages::{Collaborators, Pipeline};
pub use synthesis::{Voice, synthesize_chunks};
