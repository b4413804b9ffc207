//! Well-known Bedrock models and embedders, keyed by short alias

use std::sync::Arc;

use conduit_core::{Embedder, Error, Model, Registry};
use indexmap::IndexMap;

use crate::capabilities::ModelType;
use crate::plugin::{BedrockPlugin, ModelDefinition};

/// Alias, model identifier and type of each common model
pub const COMMON_MODELS: &[(&str, &str, ModelType)] = &[
    ("claude-haiku", "anthropic.claude-3-haiku-20240307-v1:0", ModelType::Chat),
    ("claude-sonnet", "anthropic.claude-3-5-sonnet-20241022-v2:0", ModelType::Chat),
    ("claude-opus-4", "anthropic.claude-opus-4-20250514-v1:0", ModelType::Chat),
    ("claude-sonnet-4", "anthropic.claude-sonnet-4-20250514-v1:0", ModelType::Chat),
    ("claude-3-7-sonnet", "anthropic.claude-3-7-sonnet-20250219-v1:0", ModelType::Chat),
    ("nova-micro", "amazon.nova-micro-v1:0", ModelType::Chat),
    ("nova-lite", "amazon.nova-lite-v1:0", ModelType::Chat),
    ("nova-pro", "amazon.nova-pro-v1:0", ModelType::Chat),
    ("titan-text", "amazon.titan-text-premier-v1:0", ModelType::Chat),
    ("llama3-8b", "meta.llama3-8b-instruct-v1:0", ModelType::Chat),
    ("llama3-1-8b", "meta.llama3-1-8b-instruct-v1:0", ModelType::Chat),
    ("llama3-2-3b", "meta.llama3-2-3b-instruct-v1:0", ModelType::Chat),
    ("llama4-maverick", "meta.llama4-maverick-17b-instruct-v1:0", ModelType::Chat),
    ("llama4-scout", "meta.llama4-scout-17b-instruct-v1:0", ModelType::Chat),
    ("deepseek-r1", "deepseek.r1-v1:0", ModelType::Chat),
    ("titan-image", "amazon.titan-image-generator-v1", ModelType::Image),
    ("nova-canvas", "amazon.nova-canvas-v1:0", ModelType::Image),
];

/// Alias and model identifier of each common embedder
pub const COMMON_EMBEDDERS: &[(&str, &str)] = &[
    ("titan-embed", "amazon.titan-embed-text-v1"),
    ("titan-embed-v2", "amazon.titan-embed-text-v2:0"),
    ("titan-multimodal", "amazon.titan-embed-image-v1"),
    ("cohere-embed", "cohere.embed-english-v3"),
    ("cohere-multilingual", "cohere.embed-multilingual-v3"),
];

impl BedrockPlugin {
    /// Define every common model with inferred capabilities
    ///
    /// # Errors
    ///
    /// Returns `Error::NotInitialized` before `init`
    pub fn define_common_models(&self, registry: &Registry) -> Result<IndexMap<&'static str, Arc<dyn Model>>, Error> {
        let mut models = IndexMap::with_capacity(COMMON_MODELS.len());
        for &(alias, name, model_type) in COMMON_MODELS {
            let model = self.define_model(registry, &ModelDefinition::new(name, model_type), None)?;
            models.insert(alias, model);
        }

        tracing::debug!(count = models.len(), "defined common models");
        Ok(models)
    }

    /// Define every common embedder
    ///
    /// # Errors
    ///
    /// Returns `Error::NotInitialized` before `init`
    pub fn define_common_embedders(
        &self,
        registry: &Registry,
    ) -> Result<IndexMap<&'static str, Arc<dyn Embedder>>, Error> {
        let mut embedders = IndexMap::with_capacity(COMMON_EMBEDDERS.len());
        for &(alias, name) in COMMON_EMBEDDERS {
            embedders.insert(alias, self.define_embedder(registry, name)?);
        }

        tracing::debug!(count = embedders.len(), "defined common embedders");
        Ok(embedders)
    }
}
