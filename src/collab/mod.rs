//! Collaborator seams: everything the stages talk to outside the process.
//!
//! Stages only see these traits. Concrete network clients live behind
//! cargo features; `mock` carries in-process doubles.

pub mod error;
pub mod fs_store;
#[cfg(feature = "html")]
pub mod html;
#[cfg(feature = "http")]
pub mod http;
pub mod mock;

pub use error::CollaboratorError;
pub use fs_store::FsArtifactStore;
#[cfg(feature = "html")]
pub use html::HtmlExtractor;
#[cfg(feature = "http")]
pub use http::HttpFetcher;

use crate::segment::TextKind;
use serde_json::Value;
use std::sync::Arc;

pub type CollabResult<T> = std::result::Result<T, CollaboratorError>;

/// Retrieves a raw document by locator.
pub trait ContentFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> CollabResult<String>;
}

/// Turns a raw document into readable plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, document: &str) -> CollabResult<String>;
}

/// Durable storage addressed by `(location, key)`.
pub trait ArtifactStore: Send + Sync {
    fn put_text(&self, location: &str, key: &str, text: &str) -> CollabResult<()>;

    fn get_text(&self, location: &str, key: &str) -> CollabResult<String>;

    fn put_json(&self, location: &str, key: &str, value: &Value) -> CollabResult<()>;

    fn put_bytes(
        &self,
        location: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> CollabResult<()>;
}

/// Sends a family-specific request body to a hosted model.
pub trait LanguageModelProvider: Send + Sync {
    fn invoke_model(&self, model_id: &str, body: &Value) -> CollabResult<Value>;
}

/// One chunk submitted for synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeechRequest<'a> {
    pub text: &'a str,
    pub kind: TextKind,
    pub voice_id: &'a str,
    pub output_format: &'a str,
}

/// Converts one chunk of text to encoded audio.
pub trait SpeechSynthesisProvider: Send + Sync {
    fn synthesize(&self, request: &SpeechRequest<'_>) -> CollabResult<Vec<u8>>;
}

impl<T: ContentFetcher + ?Sized> ContentFetcher for Arc<T> {
    fn fetch(&self, url: &str) -> CollabResult<String> {
        (**self).fetch(url)
    }
}

impl<T: TextExtractor + ?Sized> TextExtractor for Arc<T> {
    fn extract(&self, document: &str) -> CollabResult<String> {
        (**self).extract(document)
    }
}

impl<T: ArtifactStore + ?Sized> ArtifactStore for Arc<T> {
    fn put_text(&self, location: &str, key: &str, text: &str) -> CollabResult<()> {
        (**self).put_text(location, key, text)
    }

    fn get_text(&self, location: &str, key: &str) -> CollabResult<String> {
        (**self).get_text(location, key)
    }

    fn put_json(&self, location: &str, key: &str, value: &Value) -> CollabResult<()> {
        (**self).put_json(location, key, value)
    }

    fn put_bytes(
        &self,
        location: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> CollabResult<()> {
        (**self).put_bytes(location, key, bytes, content_type)
    }
}

impl<T: LanguageModelProvider + ?Sized> LanguageModelProvider for Arc<T> {
    fn invoke_model(&self, model_id: &str, body: &Value) -> CollabResult<Value> {
        (**self).invoke_model(model_id, body)
    }
}

impl<T: SpeechSynthesisProvider + ?Sized> SpeechSynthesisProvider for Arc<T> {
    fn synthesize(&self, request: &SpeechRequest<'_>) -> CollabResult<Vec<u8>> {
        (**self).synthesize(request)
    }
}
