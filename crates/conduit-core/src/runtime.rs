//! Seam over the Bedrock runtime SDK client
//!
//! Adapters talk to [`RuntimeClient`] rather than the SDK directly, so the
//! translation logic can be driven by a scripted client in tests. The SDK's
//! own retry, timeout and credential handling sit behind
//! [`SdkRuntimeClient`].

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_bedrockruntime::operation::converse_stream::ConverseStreamOutput as ConverseStreamResponse;
use aws_sdk_bedrockruntime::types::{
    ContentBlockDelta, ContentBlockStart, ConverseOutput, ConverseStreamOutput, InferenceConfiguration,
    Message as WireMessage, StopReason, SystemContentBlock, TokenUsage, ToolConfiguration,
};
use aws_smithy_types::Blob;
use aws_smithy_types::error::display::DisplayErrorContext;

use crate::error::TransportError;

/// A fully built Converse / ConverseStream call
#[derive(Debug, Clone)]
pub struct ConverseRequest {
    pub model_id: String,
    pub messages: Vec<WireMessage>,
    pub system: Vec<SystemContentBlock>,
    pub inference_config: Option<InferenceConfiguration>,
    pub tool_config: Option<ToolConfiguration>,
}

/// Token counts reported by the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenCounts {
    pub input: i32,
    pub output: i32,
    pub total: i32,
    pub cache_read: i32,
}

impl From<&TokenUsage> for TokenCounts {
    fn from(usage: &TokenUsage) -> Self {
        Self {
            input: usage.input_tokens(),
            output: usage.output_tokens(),
            total: usage.total_tokens(),
            cache_read: usage.cache_read_input_tokens().unwrap_or_default(),
        }
    }
}

/// Result of a non-streaming Converse call
#[derive(Debug, Clone)]
pub struct ConverseReply {
    /// Output message, absent when the service returned no message
    pub message: Option<WireMessage>,
    pub stop_reason: StopReason,
    pub usage: Option<TokenCounts>,
}

/// Normalized ConverseStream event
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Incremental text for content block `index`
    TextDelta { index: i32, text: String },
    /// A tool-use block opened
    ToolUseStart {
        index: i32,
        tool_use_id: String,
        name: String,
    },
    /// JSON fragment of a tool-use block's input
    ToolUseDelta { index: i32, input: String },
    /// Content block `index` closed
    BlockStop { index: i32 },
    /// The model finished its message
    MessageStop(StopReason),
    /// Trailing usage metadata
    Metadata(TokenCounts),
    /// Anything the translation layer does not consume
    Other,
}

/// Ordered event source for one streaming call
///
/// Dropping the stream releases the underlying connection.
#[async_trait]
pub trait ConverseEventStream: Send {
    /// Next event, or `None` once the service closed the stream
    async fn recv(&mut self) -> Result<Option<StreamEvent>, TransportError>;
}

/// The three runtime operations the adapters need
#[async_trait]
pub trait RuntimeClient: Send + Sync {
    async fn converse(&self, request: ConverseRequest) -> Result<ConverseReply, TransportError>;

    async fn converse_stream(&self, request: ConverseRequest) -> Result<Box<dyn ConverseEventStream>, TransportError>;

    /// Raw JSON `InvokeModel`
    async fn invoke_model(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError>;
}

/// [`RuntimeClient`] backed by the AWS SDK
#[derive(Debug, Clone)]
pub struct SdkRuntimeClient {
    client: BedrockClient,
}

impl SdkRuntimeClient {
    pub const fn new(client: BedrockClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RuntimeClient for SdkRuntimeClient {
    async fn converse(&self, request: ConverseRequest) -> Result<ConverseReply, TransportError> {
        let output = self
            .client
            .converse()
            .model_id(&request.model_id)
            .set_messages(Some(request.messages))
            .set_system((!request.system.is_empty()).then_some(request.system))
            .set_inference_config(request.inference_config)
            .set_tool_config(request.tool_config)
            .send()
            .await
            .map_err(|e| TransportError::new("converse", &request.model_id, DisplayErrorContext(&e)))?;

        let message = match output.output() {
            Some(ConverseOutput::Message(message)) => Some(message.clone()),
            _ => None,
        };

        Ok(ConverseReply {
            message,
            stop_reason: output.stop_reason().clone(),
            usage: output.usage().map(TokenCounts::from),
        })
    }

    async fn converse_stream(&self, request: ConverseRequest) -> Result<Box<dyn ConverseEventStream>, TransportError> {
        let output = self
            .client
            .converse_stream()
            .model_id(&request.model_id)
            .set_messages(Some(request.messages))
            .set_system((!request.system.is_empty()).then_some(request.system))
            .set_inference_config(request.inference_config)
            .set_tool_config(request.tool_config)
            .send()
            .await
            .map_err(|e| TransportError::new("converse_stream", &request.model_id, DisplayErrorContext(&e)))?;

        Ok(Box::new(SdkEventStream {
            model_id: request.model_id,
            response: output,
        }))
    }

    async fn invoke_model(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let output = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| TransportError::new("invoke_model", model_id, DisplayErrorContext(&e)))?;

        Ok(output.body.into_inner())
    }
}

struct SdkEventStream {
    model_id: String,
    response: ConverseStreamResponse,
}

#[async_trait]
impl ConverseEventStream for SdkEventStream {
    async fn recv(&mut self) -> Result<Option<StreamEvent>, TransportError> {
        match self.response.stream.recv().await {
            Ok(Some(output)) => Ok(Some(normalize_event(&output))),
            Ok(None) => Ok(None),
            Err(e) => Err(TransportError::new(
                "converse_stream",
                &self.model_id,
                DisplayErrorContext(&e),
            )),
        }
    }
}

fn normalize_event(output: &ConverseStreamOutput) -> StreamEvent {
    match output {
        ConverseStreamOutput::ContentBlockDelta(event) => {
            let index = event.content_block_index();
            match event.delta() {
                Some(ContentBlockDelta::Text(text)) => StreamEvent::TextDelta {
                    index,
                    text: text.clone(),
                },
                Some(ContentBlockDelta::ToolUse(tool)) => StreamEvent::ToolUseDelta {
                    index,
                    input: tool.input().to_owned(),
                },
                _ => StreamEvent::Other,
            }
        }
        ConverseStreamOutput::ContentBlockStart(event) => match event.start() {
            Some(ContentBlockStart::ToolUse(tool)) => StreamEvent::ToolUseStart {
                index: event.content_block_index(),
                tool_use_id: tool.tool_use_id().to_owned(),
                name: tool.name().to_owned(),
            },
            _ => StreamEvent::Other,
        },
        ConverseStreamOutput::ContentBlockStop(event) => StreamEvent::BlockStop {
            index: event.content_block_index(),
        },
        ConverseStreamOutput::MessageStop(event) => StreamEvent::MessageStop(event.stop_reason().clone()),
        ConverseStreamOutput::Metadata(event) => event
            .usage()
            .map_or(StreamEvent::Other, |usage| StreamEvent::Metadata(TokenCounts::from(usage))),
        _ => StreamEvent::Other,
    }
}
