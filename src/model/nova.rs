//! Amazon Nova envelope.

use crate::model::adapter::{InvocationParams, ModelAdapter, encode, non_empty_text};
use crate::model::error::DispatchError;
use crate::model::family::ModelFamily;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize)]
struct Request<'a> {
    messages: [Message<'a>; 1],
    #[serde(rename = "inferenceConfig")]
    inference_config: InferenceConfig,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: [ContentBlock<'a>; 1],
}

#[derive(Serialize)]
struct ContentBlock<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct InferenceConfig {
    #[serde(rename = "maxTokens")]
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Response {
    output: Output,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Output {
    message: OutputMessage,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct OutputMessage {
    content: Vec<ResponseBlock>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ResponseBlock {
    text: Option<String>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NovaAdapter;

impl ModelAdapter for NovaAdapter {
    fn family(&self) -> ModelFamily {
        ModelFamily::Nova
    }

    fn prefixes(&self) -> &'static [&'static str] {
        &["amazon.nova"]
    }

    fn request_body(&self, prompt: &str, params: &InvocationParams) -> Result<Value, DispatchError> {
        let request = Request {
            messages: [Message {
                role: "user",
                content: [ContentBlock { text: prompt }],
            }],
            inference_config: InferenceConfig {
                max_tokens: params.max_tokens,
                temperature: params.temperature,
            },
        };
        encode(self.family(), &request)
    }

    fn extract_text(&self, response: &Value) -> Result<String, DispatchError> {
        let parsed = Response::deserialize(response).unwrap_or_default();
        // Non-text blocks (tool use, reasoning) may precede the answer.
        let text = parsed
            .output
            .message
            .content
            .iter()
            .find_map(|block| block.text.as_deref());
        non_empty_text(self.family(), text)
    }
}
