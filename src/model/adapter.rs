//! Per-family request/response adapters.

use crate::defaults;
use crate::model::error::DispatchError;
use crate::model::family::ModelFamily;
use serde_json::Value;

/// Sampling parameters for one invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvocationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for InvocationParams {
    fn default() -> Self {
        Self {
            max_tokens: defaults::MAX_TOKENS,
            temperature: defaults::TEMPERATURE,
        }
    }
}

/// Request envelope and response extraction for one model family.
///
/// Adding a family means adding an implementation and registering it; the
/// existing adapters are never touched.
pub trait ModelAdapter: Send + Sync {
    fn family(&self) -> ModelFamily;

    /// Vendor prefixes (after any regional qualifier) this adapter serves.
    fn prefixes(&self) -> &'static [&'static str];

    /// Build the JSON request body for `prompt`.
    fn request_body(&self, prompt: &str, params: &InvocationParams) -> Result<Value, DispatchError>;

    /// Pull the generated text out of a provider response.
    fn extract_text(&self, response: &Value) -> Result<String, DispatchError>;

    /// Whether a region-stripped identifier belongs to this family.
    fn matches(&self, bare_model_id: &str) -> bool {
        self.prefixes()
            .iter()
            .any(|prefix| bare_model_id.starts_with(prefix))
    }
}

pub(crate) fn encode<T: serde::Serialize>(
    family: ModelFamily,
    body: &T,
) -> Result<Value, DispatchError> {
    serde_json::to_value(body).map_err(|source| DispatchError::RequestEncoding { family, source })
}

/// Normalize extracted text: trimmed and non-empty.
pub(crate) fn non_empty_text(
    family: ModelFamily,
    text: Option<&str>,
) -> Result<String, DispatchError> {
    match text.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(DispatchError::MissingContent {
            family,
            what: "text",
        }),
    }
}
