use serde::{Deserialize, Serialize};

use super::message::{Message, Part, Role, ToolRequest};

/// Reason the model stopped generating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FinishReason {
    /// Natural end of generation
    Stop,
    /// Hit the output token limit
    Length,
    /// Content was filtered
    Blocked,
    /// Any other remote stop signal
    Other,
    #[default]
    Unknown,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
    /// Prompt tokens served from the prompt cache
    #[serde(default)]
    pub cached_content_tokens: u32,
}

/// Final result of a generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResponse {
    /// Generated message, always with the model role
    pub message: Message,
    pub finish_reason: FinishReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl ModelResponse {
    /// Build a model-role response from its parts
    pub const fn new(content: Vec<Part>, finish_reason: FinishReason, usage: Option<Usage>) -> Self {
        Self {
            message: Message::new(Role::Model, content),
            finish_reason,
            usage,
        }
    }

    /// Concatenated text of the response
    pub fn text(&self) -> String {
        self.message.text()
    }

    /// Tool requests in the order the model issued them
    pub fn tool_requests(&self) -> impl Iterator<Item = &ToolRequest> {
        self.message.content.iter().filter_map(|part| match part {
            Part::ToolRequest(request) => Some(request),
            _ => None,
        })
    }
}

/// Incremental piece of a streaming response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponseChunk {
    /// Index of the candidate this chunk belongs to
    pub index: u32,
    pub content: Vec<Part>,
}

impl ModelResponseChunk {
    pub fn text(&self) -> String {
        self.content.iter().filter_map(Part::as_text).collect()
    }
}
