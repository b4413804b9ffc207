use std::fmt::Display;

use thiserror::Error;

/// Failure of a call made through the runtime client
///
/// Carries the operation and model so the caller can tell which remote call
/// broke without inspecting the SDK error chain.
#[derive(Debug, Error)]
#[error("{operation} failed for model {model}: {message}")]
pub struct TransportError {
    /// Remote operation name (e.g. `converse`, `invoke_model`)
    pub operation: &'static str,
    /// Model identifier the call targeted
    pub model: String,
    /// Rendered error chain from the SDK
    pub message: String,
}

impl TransportError {
    pub fn new(operation: &'static str, model: impl Into<String>, source: impl Display) -> Self {
        Self {
            operation,
            model: model.into(),
            message: source.to_string(),
        }
    }
}

/// A tool input schema that could not be turned into a canonical schema
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema was JSON `null`
    #[error("schema is null")]
    Missing,

    /// Schema text or bytes were not valid JSON
    #[error("failed to parse schema JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// Typed schema value could not be serialized
    #[error("failed to serialize schema: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Schema decoded to something other than a JSON object
    #[error("schema must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },
}

/// Errors surfaced by models and embedders
#[derive(Debug, Error)]
pub enum Error {
    /// No image or embedding family handles this model
    #[error("unsupported model: {model}")]
    UnsupportedModel { model: String },

    /// Remote call succeeded but produced nothing usable
    #[error("model {model} returned no {artifact}")]
    EmptyResult { model: String, artifact: &'static str },

    /// Remote call failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Streaming callback reported a failure
    #[error("stream callback failed: {0}")]
    Callback(#[source] anyhow::Error),

    /// Request cannot be served as given
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Remote payload could not be decoded
    #[error("failed to decode response from {model}: {message}")]
    Decode { model: String, message: String },

    /// Caller cancelled the request
    #[error("request cancelled")]
    Cancelled,

    /// Plugin used before `init`
    #[error("bedrock plugin not initialized")]
    NotInitialized,

    /// `init` called twice
    #[error("bedrock plugin already initialized")]
    AlreadyInitialized,

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl Error {
    /// Whether a caller-side retry could succeed
    ///
    /// Only transport failures qualify. Nothing in this workspace retries on
    /// its own; the SDK client owns retry policy.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Build a decode error for a model payload
    pub fn decode(model: impl Into<String>, message: impl Display) -> Self {
        Self::Decode {
            model: model.into(),
            message: message.to_string(),
        }
    }
}
