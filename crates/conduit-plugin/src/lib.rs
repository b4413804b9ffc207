//! AWS Bedrock plugin for conduit
//!
//! Owns the runtime client, infers what each model supports, and registers
//! chat, image and embedding models under the `bedrock` provider.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc, clippy::module_name_repetitions)]

pub mod capabilities;
mod common;
mod plugin;

pub use capabilities::{ModelType, infer};
pub use common::{COMMON_EMBEDDERS, COMMON_MODELS};
pub use plugin::{BedrockPlugin, ModelDefinition, PROVIDER, PluginOptions, StaticCredentials, is_defined_model, model};
