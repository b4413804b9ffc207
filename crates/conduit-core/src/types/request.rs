use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::message::Message;
use crate::error::SchemaError;

/// Raw tool input schema as supplied by the caller
///
/// A `Value::String` is treated as JSON text, the same as `Json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaSource {
    /// Already-structured JSON value
    Value(Value),
    /// JSON-encoded text
    Json(String),
    /// JSON-encoded bytes
    Bytes(Vec<u8>),
}

impl SchemaSource {
    /// Capture any serializable schema type
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Serialize` if the value cannot be serialized
    pub fn from_serializable<T: Serialize + ?Sized>(schema: &T) -> Result<Self, SchemaError> {
        serde_json::to_value(schema)
            .map(Self::Value)
            .map_err(SchemaError::Serialize)
    }
}

impl From<Value> for SchemaSource {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for SchemaSource {
    fn from(text: &str) -> Self {
        Self::Json(text.to_owned())
    }
}

impl From<Vec<u8>> for SchemaSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

/// Definition of a tool the model may call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Tool name, matched exactly against tool-use blocks
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Input schema in any supported representation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<SchemaSource>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: impl Into<SchemaSource>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: Some(input_schema.into()),
        }
    }
}

/// Generation request handed to a model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelRequest {
    /// Conversation messages
    pub messages: Vec<Message>,
    /// Free-form generation config (inference parameters, image overrides)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    /// Tools available to the model
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

impl ModelRequest {
    pub const fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            config: None,
            tools: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }
}
