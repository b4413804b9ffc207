//! Shared foundation for conduit
//!
//! Holds the generic chat-framework interface the Bedrock adapters plug
//! into, the request context, the error taxonomy, and the seam over the
//! Bedrock runtime SDK client.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod context;
pub mod document;
pub mod error;
pub mod registry;
pub mod runtime;
pub mod types;

pub use context::RequestContext;
pub use error::{Error, SchemaError, TransportError};
pub use registry::Registry;
pub use runtime::{ConverseEventStream, ConverseReply, ConverseRequest, RuntimeClient, SdkRuntimeClient, StreamEvent, TokenCounts};
pub use types::*;
