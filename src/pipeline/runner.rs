//! Payload-level entry points: one stage at a time, or all three in order.

use crate::error::Result;
use crate::event::{self, Stage, fields};
use crate::pipeline::stages::Pipeline;
use serde_json::Value;
use tracing::info;

/// Fields fixed by the caller at job start and carried into every stage input.
const CARRIED_FIELDS: [&str; 6] = [
    fields::JOB_ID,
    fields::SOURCE_URL,
    fields::TITLE,
    fields::STYLE,
    fields::VOICE_ID,
    fields::BUCKET,
];

/// Runs stages the way an external workflow engine would: JSON in, JSON out.
pub struct LocalRunner {
    pipeline: Pipeline,
}

impl LocalRunner {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Validate `payload` for `stage`, run it and return the serialized event.
    pub fn run_stage(&self, stage: &str, payload: &Value) -> Result<Value> {
        let event = event::validate(payload, Some(stage))?;
        let stage: Stage = stage.parse()?;
        let output = self.pipeline.run(stage, &event)?;
        info!(stage = %stage, job_id = output.job_id().unwrap_or_default(), "stage complete");
        Ok(output.to_payload())
    }

    /// Run extract, rewrite and synthesize in sequence.
    ///
    /// Each stage receives the previous stage's output with the caller's
    /// original job fields carried forward.
    pub fn run_all(&self, payload: &Value) -> Result<Value> {
        let original = event::validate(payload, Some(Stage::Extract.as_str()))?.to_payload();

        let mut current = original.clone();
        let mut stage = Some(Stage::Extract);
        while let Some(step) = stage {
            let input = carry_forward(&original, current);
            current = self.run_stage(step.as_str(), &input)?;
            stage = step.next();
        }
        Ok(current)
    }
}

fn carry_forward(original: &Value, mut next: Value) -> Value {
    if let (Some(original), Some(map)) = (original.as_object(), next.as_object_mut()) {
        for name in CARRIED_FIELDS {
            if let Some(value) = original.get(name) {
                map.entry(name).or_insert_with(|| value.clone());
            }
        }
    }
    next
}
