//! In-process collaborator doubles for tests and dry runs.

use crate::collab::{
    ArtifactStore, CollabResult, CollaboratorError, ContentFetcher, LanguageModelProvider,
    SpeechRequest, SpeechSynthesisProvider, TextExtractor,
};
use crate::segment::TextKind;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fetcher serving canned documents.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    fallback: Option<String>,
    documents: HashMap<String, String>,
    fetched: Mutex<Vec<String>>,
}

impl StaticFetcher {
    /// Serve `document` for every locator.
    pub fn new(document: &str) -> Self {
        Self {
            fallback: Some(document.to_string()),
            ..Self::default()
        }
    }

    /// Fetcher that knows no documents; every fetch fails.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Serve `document` for `url` only.
    pub fn with_document(mut self, url: &str, document: &str) -> Self {
        self.documents.insert(url.to_string(), document.to_string());
        self
    }

    /// Locators requested so far, in order.
    pub fn fetched(&self) -> Vec<String> {
        lock(&self.fetched).clone()
    }
}

impl ContentFetcher for StaticFetcher {
    fn fetch(&self, url: &str) -> CollabResult<String> {
        lock(&self.fetched).push(url.to_string());
        self.documents
            .get(url)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| CollaboratorError::Fetch {
                url: url.to_string(),
                message: "HTTP 404".to_string(),
            })
    }
}

/// Extractor that treats the document as already-readable text.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughExtractor;

impl TextExtractor for PassthroughExtractor {
    fn extract(&self, document: &str) -> CollabResult<String> {
        let text = document.trim();
        if text.is_empty() {
            return Err(CollaboratorError::NoReadableContent);
        }
        Ok(text.to_string())
    }
}

/// A stored object and the content type it was written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Artifact store held in memory.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    objects: Mutex<BTreeMap<(String, String), StoredArtifact>>,
    read_only: bool,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a text object before the run starts.
    pub fn with_text(self, location: &str, key: &str, text: &str) -> Self {
        self.insert(location, key, text.as_bytes().to_vec(), "text/plain; charset=utf-8");
        self
    }

    /// Reject every write.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn get(&self, location: &str, key: &str) -> Option<StoredArtifact> {
        lock(&self.objects)
            .get(&(location.to_string(), key.to_string()))
            .cloned()
    }

    pub fn text(&self, location: &str, key: &str) -> Option<String> {
        self.get(location, key)
            .and_then(|artifact| String::from_utf8(artifact.bytes).ok())
    }

    pub fn json(&self, location: &str, key: &str) -> Option<Value> {
        self.get(location, key)
            .and_then(|artifact| serde_json::from_slice(&artifact.bytes).ok())
    }

    pub fn content_type(&self, location: &str, key: &str) -> Option<String> {
        self.get(location, key).map(|artifact| artifact.content_type)
    }

    /// All `(location, key)` pairs, sorted.
    pub fn keys(&self) -> Vec<(String, String)> {
        lock(&self.objects).keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.objects).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, location: &str, key: &str, bytes: Vec<u8>, content_type: &str) {
        lock(&self.objects).insert(
            (location.to_string(), key.to_string()),
            StoredArtifact {
                bytes,
                content_type: content_type.to_string(),
            },
        );
    }

    fn write(
        &self,
        location: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> CollabResult<()> {
        if self.read_only {
            return Err(CollaboratorError::store(location, key, "store is read-only"));
        }
        self.insert(location, key, bytes, content_type);
        Ok(())
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn put_text(&self, location: &str, key: &str, text: &str) -> CollabResult<()> {
        self.write(
            location,
            key,
            text.as_bytes().to_vec(),
            "text/plain; charset=utf-8",
        )
    }

    fn get_text(&self, location: &str, key: &str) -> CollabResult<String> {
        let artifact = self.get(location, key).ok_or_else(|| CollaboratorError::NotFound {
            location: location.to_string(),
            key: key.to_string(),
        })?;
        String::from_utf8(artifact.bytes)
            .map_err(|err| CollaboratorError::store(location, key, err))
    }

    fn put_json(&self, location: &str, key: &str, value: &Value) -> CollabResult<()> {
        let bytes =
            serde_json::to_vec(value).map_err(|err| CollaboratorError::store(location, key, err))?;
        self.write(location, key, bytes, "application/json")
    }

    fn put_bytes(
        &self,
        location: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> CollabResult<()> {
        self.write(location, key, bytes.to_vec(), content_type)
    }
}

/// Model provider replaying scripted responses.
///
/// Responses are returned in order; the last one repeats once the queue
/// is down to it.
#[derive(Debug, Default)]
pub struct ScriptedModelProvider {
    responses: Mutex<VecDeque<Value>>,
    failure: Option<String>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedModelProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw response body.
    pub fn with_response(self, response: Value) -> Self {
        lock(&self.responses).push_back(response);
        self
    }

    /// Fail every invocation with `message`.
    pub fn with_failure(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// `(model_id, body)` for every invocation so far.
    pub fn calls(&self) -> Vec<(String, Value)> {
        lock(&self.calls).clone()
    }
}

impl LanguageModelProvider for ScriptedModelProvider {
    fn invoke_model(&self, model_id: &str, body: &Value) -> CollabResult<Value> {
        lock(&self.calls).push((model_id.to_string(), body.clone()));
        if let Some(message) = &self.failure {
            return Err(CollaboratorError::Model {
                message: message.clone(),
            });
        }

        let mut responses = lock(&self.responses);
        let response = if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().cloned()
        };
        response.ok_or_else(|| CollaboratorError::Model {
            message: "no scripted response".to_string(),
        })
    }
}

/// Synthesis request as the provider saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSpeech {
    pub text: String,
    pub kind: TextKind,
    pub voice_id: String,
    pub output_format: String,
}

/// Speech provider that "encodes" each chunk as `[<text>]`.
#[derive(Debug, Default)]
pub struct MockSpeechProvider {
    empty_audio: bool,
    fail_on: Option<String>,
    requests: Mutex<Vec<RecordedSpeech>>,
}

impl MockSpeechProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return zero bytes for every chunk.
    pub fn with_empty_audio(mut self) -> Self {
        self.empty_audio = true;
        self
    }

    /// Fail any chunk containing `needle`.
    pub fn with_failure_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_string());
        self
    }

    /// Requests received so far. Order follows arrival, which is not chunk
    /// order when synthesis runs in parallel.
    pub fn requests(&self) -> Vec<RecordedSpeech> {
        lock(&self.requests).clone()
    }
}

impl SpeechSynthesisProvider for MockSpeechProvider {
    fn synthesize(&self, request: &SpeechRequest<'_>) -> CollabResult<Vec<u8>> {
        lock(&self.requests).push(RecordedSpeech {
            text: request.text.to_string(),
            kind: request.kind,
            voice_id: request.voice_id.to_string(),
            output_format: request.output_format.to_string(),
        });

        if let Some(needle) = &self.fail_on
            && request.text.contains(needle.as_str())
        {
            return Err(CollaboratorError::Synthesis {
                message: format!("mock failure on '{needle}'"),
            });
        }
        if self.empty_audio {
            return Ok(Vec::new());
        }
        Ok(format!("[{}]", request.text).into_bytes())
    }
}
