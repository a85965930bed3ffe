//! Anthropic messages envelope.

use crate::model::adapter::{InvocationParams, ModelAdapter, encode, non_empty_text};
use crate::model::error::DispatchError;
use crate::model::family::ModelFamily;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// API version pinned in every request body.
pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

#[derive(Serialize)]
struct Request<'a> {
    anthropic_version: &'static str,
    max_tokens: u32,
    temperature: f32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: [ContentBlock<'a>; 1],
}

#[derive(Serialize)]
struct ContentBlock<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Response {
    content: Vec<ResponseBlock>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ResponseBlock {
    text: Option<String>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AnthropicAdapter;

impl ModelAdapter for AnthropicAdapter {
    fn family(&self) -> ModelFamily {
        ModelFamily::Anthropic
    }

    fn prefixes(&self) -> &'static [&'static str] {
        &["anthropic."]
    }

    fn request_body(&self, prompt: &str, params: &InvocationParams) -> Result<Value, DispatchError> {
        let request = Request {
            anthropic_version: ANTHROPIC_VERSION,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            messages: [Message {
                role: "user",
                content: [ContentBlock {
                    kind: "text",
                    text: prompt,
                }],
            }],
        };
        encode(self.family(), &request)
    }

    fn extract_text(&self, response: &Value) -> Result<String, DispatchError> {
        let parsed = Response::deserialize(response).unwrap_or_default();
        let first = parsed.content.first().ok_or(DispatchError::MissingContent {
            family: self.family(),
            what: "content",
        })?;
        non_empty_text(self.family(), first.text.as_deref())
    }
}
