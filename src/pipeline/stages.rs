//! The three stage transformations.

use crate::collab::{
    ArtifactStore, ContentFetcher, LanguageModelProvider, SpeechSynthesisProvider, TextExtractor,
};
use crate::defaults;
use crate::error::Result;
use crate::event::{EventUpdate, PipelineEvent, Stage};
use crate::model::{ModelRegistry, build_prompt};
use crate::pipeline::keys;
use crate::pipeline::settings::{PipelineSettings, estimate_duration_secs};
use crate::pipeline::synthesis::{Voice, synthesize_chunks};
use crate::segment::{Segmenter, SpeechText, render};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// External systems the stages call.
#[derive(Clone)]
pub struct Collaborators {
    pub fetcher: Arc<dyn ContentFetcher>,
    pub extractor: Arc<dyn TextExtractor>,
    pub store: Arc<dyn ArtifactStore>,
    pub model: Arc<dyn LanguageModelProvider>,
    pub speech: Arc<dyn SpeechSynthesisProvider>,
}

/// Stage functions over [`PipelineEvent`]s.
///
/// Each stage takes the previous event by reference and returns a new one.
/// Nothing is retried; the first collaborator failure ends the stage.
pub struct Pipeline {
    settings: PipelineSettings,
    collaborators: Collaborators,
    registry: ModelRegistry,
    segmenter: Segmenter,
}

impl Pipeline {
    pub fn new(settings: PipelineSettings, collaborators: Collaborators) -> Self {
        let segmenter = Segmenter::with_config(settings.segmenter.clone());
        Self {
            settings,
            collaborators,
            registry: ModelRegistry::with_defaults(),
            segmenter,
        }
    }

    /// Replace the model registry (e.g. to add a family).
    pub fn with_registry(mut self, registry: ModelRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run one stage.
    pub fn run(&self, stage: Stage, event: &PipelineEvent) -> Result<PipelineEvent> {
        match stage {
            Stage::Extract => self.extract(event),
            Stage::Rewrite => self.rewrite(event),
            Stage::Synthesize => self.synthesize(event),
        }
    }

    /// Fetch the source, reduce it to readable text and store it.
    pub fn extract(&self, event: &PipelineEvent) -> Result<PipelineEvent> {
        let (job_id, source_url) = event.require_extract()?;
        let location = event.storage_location(&self.settings.storage_location);
        debug!(job_id, source_url, "extract stage");

        let document = self.collaborators.fetcher.fetch(source_url)?;
        let text = self.collaborators.extractor.extract(&document)?;

        let key = keys::article_key(job_id);
        self.collaborators.store.put_text(location, &key, &text)?;
        info!(job_id, key = %key, "stored article");

        let char_count = text.chars().count() as u64;
        Ok(event.with_updates(EventUpdate::new().bucket(location).article(key, char_count))?)
    }

    /// Rewrite the stored article into a narration script.
    pub fn rewrite(&self, event: &PipelineEvent) -> Result<PipelineEvent> {
        let (job_id, article_key) = event.require_rewrite()?;
        let location = event.storage_location(&self.settings.storage_location);
        let model_id = self.settings.model_id.as_str();
        let family = self.registry.route(model_id)?;
        debug!(job_id, model_id, %family, "rewrite stage");

        let article = self.collaborators.store.get_text(location, article_key)?;
        let prompt = build_prompt(&article, event.title(), event.style());
        let script = self.registry.invoke(
            self.collaborators.model.as_ref(),
            family,
            model_id,
            &prompt,
            &self.settings.invocation,
        )?;

        let script_key = keys::script_key(job_id);
        let metadata_key = keys::script_metadata_key(job_id);
        self.collaborators
            .store
            .put_text(location, &script_key, &script)?;
        info!(job_id, key = %script_key, "stored script");

        let metadata = json!({
            "job_id": job_id,
            "source_url": event.source_url(),
            "title": event.title(),
            "style": event.style(),
            "model_id": model_id,
            "script_s3_key": script_key,
        });
        self.collaborators
            .store
            .put_json(location, &metadata_key, &metadata)?;
        info!(job_id, key = %metadata_key, "stored script metadata");

        Ok(event.with_updates(
            EventUpdate::new()
                .bucket(location)
                .script(script_key, metadata_key),
        )?)
    }

    /// Segment the stored script, synthesize every chunk and store the audio.
    pub fn synthesize(&self, event: &PipelineEvent) -> Result<PipelineEvent> {
        let (job_id, script_key) = event.require_synthesize()?;
        let location = event.storage_location(&self.settings.storage_location);
        let voice_id = event.voice_id().unwrap_or(&self.settings.voice_id);

        let script = self.collaborators.store.get_text(location, script_key)?;
        let chunks = self.segmenter.split(&script)?;
        debug!(job_id, voice_id, chunks = chunks.len(), "synthesize stage");

        let texts = chunks
            .iter()
            .map(|chunk| render(chunk, self.settings.text_kind, &self.settings.markup))
            .collect::<std::result::Result<Vec<SpeechText>, _>>()?;

        let output_format = self.settings.output_format.as_str();
        let audio = synthesize_chunks(
            self.collaborators.speech.as_ref(),
            &texts,
            Voice {
                voice_id,
                output_format,
            },
            self.settings.parallelism,
        )?;

        let audio_key = keys::audio_key(job_id, output_format);
        self.collaborators.store.put_bytes(
            location,
            &audio_key,
            &audio,
            defaults::audio_content_type(output_format),
        )?;
        info!(job_id, key = %audio_key, bytes = audio.len(), "stored audio");

        let duration = estimate_duration_secs(&script, self.settings.words_per_minute);
        Ok(event.with_updates(EventUpdate::new().bucket(location).audio(audio_key, duration))?)
    }
}
