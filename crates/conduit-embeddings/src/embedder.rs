use std::sync::Arc;

use async_trait::async_trait;
use conduit_core::document::merge_shallow;
use conduit_core::{EmbedRequest, EmbedResponse, Embedder, Embedding, Error, RequestContext, RuntimeClient};
use serde_json::Value;

use crate::family::EmbeddingFamilies;

/// Embedder served through InvokeModel, one call per document
pub struct BedrockEmbedder {
    name: String,
    client: Arc<dyn RuntimeClient>,
    families: Arc<EmbeddingFamilies>,
}

impl BedrockEmbedder {
    pub fn new(name: impl Into<String>, client: Arc<dyn RuntimeClient>, families: Arc<EmbeddingFamilies>) -> Self {
        Self {
            name: name.into(),
            client,
            families,
        }
    }
}

#[async_trait]
impl Embedder for BedrockEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn embed(&self, request: &EmbedRequest, context: &RequestContext) -> Result<EmbedResponse, Error> {
        let family = self
            .families
            .resolve(&self.name)
            .ok_or_else(|| Error::UnsupportedModel { model: self.name.clone() })?;

        let mut embeddings = Vec::with_capacity(request.input.len());

        for document in &request.input {
            let text = document.text();
            if text.is_empty() {
                tracing::debug!(model = %self.name, "skipping document with no text");
                continue;
            }

            let mut body = family.request_body(&text);
            if let (Value::Object(target), Some(options)) = (&mut body, &request.options) {
                merge_shallow(target, options);
            }
            let body = serde_json::to_vec(&body).map_err(|e| Error::Internal(e.into()))?;

            let raw = context
                .run(self.client.invoke_model(&self.name, body))
                .await?
                .inspect_err(|e| tracing::error!(model = %self.name, error = %e, "embedding request failed"))?;

            let embedding = family
                .parse_embedding(&raw)
                .map_err(|e| Error::decode(&self.name, e))?;

            if embedding.is_empty() {
                return Err(Error::EmptyResult {
                    model: self.name.clone(),
                    artifact: "embeddings",
                });
            }

            embeddings.push(Embedding { embedding });
        }

        tracing::debug!(model = %self.name, family = family.name(), count = embeddings.len(), "embedding completed");

        Ok(EmbedResponse { embeddings })
    }
}

#[cfg(test)]
mod tests {
    use conduit_core::{ConverseEventStream, ConverseReply, ConverseRequest, Document, TransportError};

    use super::*;

    struct Unreachable;

    #[async_trait]
    impl RuntimeClient for Unreachable {
        async fn converse(&self, _request: ConverseRequest) -> Result<ConverseReply, TransportError> {
            unreachable!("converse is never used for embeddings")
        }

        async fn converse_stream(&self, _request: ConverseRequest) -> Result<Box<dyn ConverseEventStream>, TransportError> {
            unreachable!("converse_stream is never used for embeddings")
        }

        async fn invoke_model(&self, model_id: &str, _body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
            Err(TransportError::new("invoke_model", model_id, "no network in tests"))
        }
    }

    fn embedder(name: &str) -> BedrockEmbedder {
        BedrockEmbedder::new(name, Arc::new(Unreachable), Arc::new(EmbeddingFamilies::default()))
    }

    #[tokio::test]
    async fn unsupported_family_rejected() {
        let request = EmbedRequest {
            input: vec![Document::from_text("hello")],
            options: None,
        };
        let err = embedder("mistral.mistral-embed")
            .embed(&request, &RequestContext::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::UnsupportedModel { model } if model == "mistral.mistral-embed"));
    }

    #[tokio::test]
    async fn empty_documents_never_sent() {
        let request = EmbedRequest {
            input: vec![Document::from_text(""), Document { content: Vec::new() }],
            options: None,
        };
        let response = embedder("amazon.titan-embed-text-v2:0")
            .embed(&request, &RequestContext::new())
            .await
            .unwrap();

        assert!(response.embeddings.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let request = EmbedRequest {
            input: vec![Document::from_text("hello")],
            options: None,
        };
        let err = embedder("cohere.embed-english-v3")
            .embed(&request, &RequestContext::new())
            .await
            .unwrap_err();

        assert!(err.is_transient());
    }
}
