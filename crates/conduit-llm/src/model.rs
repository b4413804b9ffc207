use std::sync::Arc;

use async_trait::async_trait;
use conduit_core::{Error, Model, ModelInfo, ModelRequest, ModelResponse, RequestContext, RuntimeClient, StreamCallback};

use crate::request::build_request;
use crate::response::from_reply;
use crate::stream::StreamAggregator;

/// Chat and text model served through Converse / ConverseStream
pub struct ConverseModel {
    name: String,
    info: ModelInfo,
    client: Arc<dyn RuntimeClient>,
}

impl ConverseModel {
    pub fn new(name: impl Into<String>, info: ModelInfo, client: Arc<dyn RuntimeClient>) -> Self {
        Self {
            name: name.into(),
            info,
            client,
        }
    }
}

#[async_trait]
impl Model for ConverseModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn info(&self) -> &ModelInfo {
        &self.info
    }

    async fn generate(
        &self,
        request: &ModelRequest,
        context: &RequestContext,
        callback: Option<&mut StreamCallback<'_>>,
    ) -> Result<ModelResponse, Error> {
        let prepared = build_request(&self.name, request)?;

        tracing::debug!(
            model = %self.name,
            messages = prepared.converse.messages.len(),
            tools = request.tools.len(),
            streaming = callback.is_some(),
            "sending converse request"
        );

        let response = match callback {
            None => {
                let reply = context
                    .run(self.client.converse(prepared.converse))
                    .await?
                    .inspect_err(|e| tracing::error!(model = %self.name, error = %e, "bedrock converse failed"))?;
                from_reply(&reply, &prepared.tools)
            }
            Some(callback) => {
                let stream = context
                    .run(self.client.converse_stream(prepared.converse))
                    .await?
                    .inspect_err(|e| tracing::error!(model = %self.name, error = %e, "bedrock converse_stream failed"))?;
                StreamAggregator::new(&prepared.tools)
                    .run(stream, context, callback)
                    .await?
            }
        };

        tracing::debug!(
            model = %self.name,
            finish_reason = %response.finish_reason,
            "converse request completed"
        );

        Ok(response)
    }
}
