#![allow(clippy::must_use_candidate)]

pub mod bedrock;
mod env;
mod loader;
pub mod telemetry;

use serde::Deserialize;

pub use bedrock::BedrockConfig;
pub use env::ExpandError;
pub use telemetry::{LogFormat, TelemetryConfig};

/// Top-level conduit configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Bedrock plugin configuration
    #[serde(default)]
    pub bedrock: BedrockConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
