//! Generic chat-framework types
//!
//! Model-agnostic request/response shapes that every Bedrock adapter
//! converts to and from.

pub mod embed;
pub mod message;
pub mod model;
pub mod request;
pub mod response;

pub use embed::{Document, EmbedRequest, EmbedResponse, Embedding};
pub use message::{Media, Message, Part, Role, ToolRequest, ToolResponse};
pub use model::{Embedder, Model, ModelInfo, ModelSupports, StreamCallback};
pub use request::{ModelRequest, SchemaSource, ToolDefinition};
pub use response::{FinishReason, ModelResponse, ModelResponseChunk, Usage};
