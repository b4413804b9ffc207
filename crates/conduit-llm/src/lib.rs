//! Chat translation for conduit
//!
//! Converts generic model requests into Bedrock Converse calls and their
//! replies, streamed or not, back into generic responses. Tool schemas are
//! normalized on the way out and used to re-type tool-call arguments on the
//! way back.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod coerce;
pub mod content;
mod model;
pub mod request;
pub mod response;
pub mod schema;
pub mod stream;

pub use model::ConverseModel;
pub use request::{PreparedRequest, build_request};
pub use schema::{CanonicalSchema, ToolSchemas, normalize, to_wire_tool};
pub use stream::StreamAggregator;
