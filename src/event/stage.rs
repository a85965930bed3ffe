//! Pipeline stages and the fields each one needs before it can run.

use crate::event::error::SchemaError;
use crate::event::fields;
use std::fmt;
use std::str::FromStr;

/// One of the three ordered transformations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Fetch the source document and store its readable text.
    Extract,
    /// Rewrite stored text into a spoken-style script.
    Rewrite,
    /// Synthesize the stored script into audio.
    Synthesize,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 3] = [Stage::Extract, Stage::Rewrite, Stage::Synthesize];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Extract => "extract",
            Stage::Rewrite => "rewrite",
            Stage::Synthesize => "synthesize",
        }
    }

    /// Wire names of the fields that must be present to enter this stage.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Stage::Extract => &[fields::JOB_ID, fields::SOURCE_URL],
            Stage::Rewrite => &[fields::JOB_ID, fields::ARTICLE_KEY],
            Stage::Synthesize => &[fields::JOB_ID, fields::SCRIPT_KEY],
        }
    }

    /// The stage that consumes this stage's output, if any.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Extract => Some(Stage::Rewrite),
            Stage::Rewrite => Some(Stage::Synthesize),
            Stage::Synthesize => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "extract" => Ok(Stage::Extract),
            "rewrite" => Ok(Stage::Rewrite),
            "synthesize" => Ok(Stage::Synthesize),
            other => Err(SchemaError::UnsupportedStage {
                stage: other.to_string(),
            }),
        }
    }
}
