use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::embed::{EmbedRequest, EmbedResponse};
use super::request::ModelRequest;
use super::response::{ModelResponse, ModelResponseChunk};
use crate::context::RequestContext;
use crate::error::Error;

/// Feature flags advertised by a model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSupports {
    /// Accepts multi-turn conversations
    pub multiturn: bool,
    /// Accepts tool definitions and issues tool requests
    pub tools: bool,
    /// Accepts a system prompt
    pub system_role: bool,
    /// Accepts or produces media
    pub media: bool,
}

/// Metadata attached to a registered model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Display label
    pub label: String,
    pub supports: ModelSupports,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<String>,
}

/// Caller-supplied callback receiving streamed chunks in arrival order
///
/// Returning an error aborts the generation.
pub type StreamCallback<'a> = dyn FnMut(&RequestContext, ModelResponseChunk) -> anyhow::Result<()> + Send + 'a;

/// A registered generation model
#[async_trait]
pub trait Model: Send + Sync {
    /// Model identifier
    fn name(&self) -> &str;

    /// Advertised metadata
    fn info(&self) -> &ModelInfo;

    /// Run a generation, streaming chunks through `callback` when given
    async fn generate(
        &self,
        request: &ModelRequest,
        context: &RequestContext,
        callback: Option<&mut StreamCallback<'_>>,
    ) -> Result<ModelResponse, Error>;
}

/// A registered embedder
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model identifier
    fn name(&self) -> &str;

    /// Embed every non-empty input document
    async fn embed(&self, request: &EmbedRequest, context: &RequestContext) -> Result<EmbedResponse, Error>;
}
