use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role of a message participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// System instruction
    System,
    /// End-user turn
    User,
    /// Model response
    Model,
    /// Tool/function result
    Tool,
}

/// Inline media carried as a data URL or raw base64 payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    /// MIME type; recovered from the data URL header when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// `data:<mime>;base64,<payload>` or bare base64
    pub url: String,
}

impl Media {
    /// Build a `data:<mime>;base64,<payload>` media value
    pub fn inline_base64(content_type: &str, payload: &str) -> Self {
        Self {
            content_type: Some(content_type.to_owned()),
            url: format!("data:{content_type};base64,{payload}"),
        }
    }

    /// Effective MIME type and base64 payload
    ///
    /// A data URL is split at its first comma; the header's MIME type is used
    /// only when `content_type` is unset. Anything else is taken to be a bare
    /// payload.
    pub fn payload(&self) -> (Option<&str>, &str) {
        let declared = self.content_type.as_deref().filter(|ct| !ct.is_empty());

        let Some((header, data)) = self.url.strip_prefix("data:").and_then(|rest| rest.split_once(',')) else {
            return (declared, &self.url);
        };

        let from_header = header.split(';').next().filter(|mime| !mime.is_empty());
        (declared.or(from_header), data)
    }
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Tool name
    pub name: String,
    /// Tool arguments
    #[serde(default)]
    pub input: Value,
    /// Correlation reference pairing this request with its response
    #[serde(default, rename = "ref")]
    pub ref_id: String,
}

/// The result of running a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Tool name
    #[serde(default)]
    pub name: String,
    /// Tool output
    #[serde(default)]
    pub output: Value,
    /// Correlation reference of the originating request
    #[serde(default, rename = "ref")]
    pub ref_id: String,
}

/// One unit of message content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub enum Part {
    Text(String),
    Media(Media),
    ToolRequest(ToolRequest),
    ToolResponse(ToolResponse),
    /// Marks the end of a cacheable prompt prefix
    CachePoint,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn media(content_type: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Media(Media {
            content_type: Some(content_type.into()),
            url: url.into(),
        })
    }

    pub fn tool_request(name: impl Into<String>, input: Value, ref_id: impl Into<String>) -> Self {
        Self::ToolRequest(ToolRequest {
            name: name.into(),
            input,
            ref_id: ref_id.into(),
        })
    }

    pub fn tool_response(name: impl Into<String>, output: Value, ref_id: impl Into<String>) -> Self {
        Self::ToolResponse(ToolResponse {
            name: name.into(),
            output,
            ref_id: ref_id.into(),
        })
    }

    /// Text content, if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message author
    pub role: Role,
    /// Ordered content parts
    pub content: Vec<Part>,
}

impl Message {
    pub const fn new(role: Role, content: Vec<Part>) -> Self {
        Self { role, content }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, vec![Part::text(text)])
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![Part::text(text)])
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, vec![Part::text(text)])
    }

    /// Concatenated text of all text parts
    pub fn text(&self) -> String {
        self.content.iter().filter_map(Part::as_text).collect()
    }
}
