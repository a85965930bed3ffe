//! Identifier routing and invocation.

use crate::collab::LanguageModelProvider;
use crate::model::adapter::{InvocationParams, ModelAdapter};
use crate::model::anthropic::AnthropicAdapter;
use crate::model::error::DispatchError;
use crate::model::family::{ModelFamily, strip_region};
use crate::model::nova::NovaAdapter;
use tracing::debug;

/// Adapters keyed by the identifier prefixes they claim.
///
/// Routing strips a regional qualifier and asks each adapter, in
/// registration order, whether the bare identifier is one of its own.
pub struct ModelRegistry {
    adapters: Vec<Box<dyn ModelAdapter>>,
}

impl ModelRegistry {
    /// Empty registry; every identifier is unsupported until something is registered.
    pub fn new() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// Registry with the Anthropic and Nova adapters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(AnthropicAdapter);
        registry.register(NovaAdapter);
        registry
    }

    /// Add an adapter. A later registration for an already-known family
    /// replaces the earlier one.
    pub fn register<A: ModelAdapter + 'static>(&mut self, adapter: A) {
        let family = adapter.family();
        self.adapters.retain(|existing| existing.family() != family);
        self.adapters.push(Box::new(adapter));
    }

    pub fn families(&self) -> Vec<ModelFamily> {
        self.adapters.iter().map(|adapter| adapter.family()).collect()
    }

    /// Classify `model_id` into a registered family.
    pub fn route(&self, model_id: &str) -> Result<ModelFamily, DispatchError> {
        self.adapter_for_id(model_id).map(|adapter| adapter.family())
    }

    /// Send `prompt` to `model_id` using the envelope of `family`.
    pub fn invoke(
        &self,
        provider: &dyn LanguageModelProvider,
        family: ModelFamily,
        model_id: &str,
        prompt: &str,
        params: &InvocationParams,
    ) -> Result<String, DispatchError> {
        let adapter = self
            .adapters
            .iter()
            .find(|adapter| adapter.family() == family)
            .ok_or(DispatchError::FamilyNotRegistered { family })?;

        let body = adapter.request_body(prompt, params)?;
        debug!(model_id, %family, prompt_chars = prompt.chars().count(), "invoking model");
        let response = provider.invoke_model(model_id, &body)?;
        adapter.extract_text(&response)
    }

    /// Route and invoke in one step.
    pub fn complete(
        &self,
        provider: &dyn LanguageModelProvider,
        model_id: &str,
        prompt: &str,
        params: &InvocationParams,
    ) -> Result<String, DispatchError> {
        let family = self.route(model_id)?;
        self.invoke(provider, family, model_id, prompt, params)
    }

    fn adapter_for_id(&self, model_id: &str) -> Result<&dyn ModelAdapter, DispatchError> {
        let bare = strip_region(model_id.trim());
        self.adapters
            .iter()
            .find(|adapter| adapter.matches(bare))
            .map(|adapter| adapter.as_ref())
            .ok_or_else(|| DispatchError::UnsupportedModel {
                model_id: model_id.to_string(),
            })
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::mock::ScriptedModelProvider;
    use serde_json::{Value, json};

    #[test]
    fn test_routes_anthropic_ids() {
        let registry = ModelRegistry::with_defaults();
        assert_eq!(
            registry.route("anthropic.claude-3-haiku-20240307-v1:0").unwrap(),
            ModelFamily::Anthropic
        );
        assert_eq!(
            registry.route("us.anthropic.claude-3-5-sonnet").unwrap(),
            ModelFamily::Anthropic
        );
    }

    #[test]
    fn test_routes_nova_ids() {
        let registry = ModelRegistry::with_defaults();
        assert_eq!(registry.route("amazon.nova-pro-v1:0").unwrap(), ModelFamily::Nova);
        assert_eq!(registry.route("us.amazon.nova-lite-v1:0").unwrap(), ModelFamily::Nova);
        assert_eq!(registry.route("eu.amazon.nova-micro-v1:0").unwrap(), ModelFamily::Nova);
    }

    #[test]
    fn test_unknown_vendor_is_unsupported() {
        let registry = ModelRegistry::with_defaults();
        let err = registry.route("meta.llama3-8b-instruct-v1:0").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported model id: meta.llama3-8b-instruct-v1:0");
    }

    #[test]
    fn test_other_amazon_models_are_unsupported() {
        let registry = ModelRegistry::with_defaults();
        assert!(matches!(
            registry.route("amazon.titan-text-express-v1"),
            Err(DispatchError::UnsupportedModel { .. })
        ));
    }

    #[test]
    fn test_empty_registry_supports_nothing() {
        let registry = ModelRegistry::new();
        assert!(registry.route("anthropic.claude").is_err());
        assert!(registry.families().is_empty());
    }

    #[test]
    fn test_reregistering_a_family_replaces_it() {
        let mut registry = ModelRegistry::with_defaults();
        registry.register(AnthropicAdapter);
        assert_eq!(registry.families().len(), 2);
    }

    #[test]
    fn test_invoke_wraps_prompt_and_extracts_text() {
        let provider = ScriptedModelProvider::new()
            .with_response(json!({"content": [{"text": " A script. "}]}));
        let registry = ModelRegistry::with_defaults();
        let text = registry
            .complete(
                &provider,
                "anthropic.claude-3",
                "PROMPT",
                &InvocationParams::default(),
            )
            .unwrap();
        assert_eq!(text, "A script.");

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "anthropic.claude-3");
        assert_eq!(
            calls[0].1["messages"][0]["content"][0]["text"],
            Value::from("PROMPT")
        );
    }

    #[test]
    fn test_provider_failure_propagates() {
        let provider = ScriptedModelProvider::new().with_failure("throttled");
        let registry = ModelRegistry::with_defaults();
        let err = registry
            .complete(&provider, "amazon.nova-lite-v1:0", "p", &InvocationParams::default())
            .unwrap_err();
        assert!(matches!(err, DispatchError::Provider(_)));
        assert!(err.to_string().contains("throttled"));
    }

    #[test]
    fn test_invoke_unregistered_family_fails() {
        let provider = ScriptedModelProvider::new();
        let mut registry = ModelRegistry::new();
        registry.register(AnthropicAdapter);
        let err = registry
            .invoke(
                &provider,
                ModelFamily::Nova,
                "amazon.nova-lite-v1:0",
                "p",
                &InvocationParams::default(),
            )
            .unwrap_err();
        assert!(matches!(err, DispatchError::FamilyNotRegistered { .. }));
        assert!(provider.calls().is_empty());
    }
}
