use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

/// AWS Bedrock plugin configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BedrockConfig {
    /// AWS region
    #[serde(default = "default_region")]
    pub region: String,
    /// Maximum attempts made by the SDK retry layer
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Per-operation timeout (e.g. "30s", "2m")
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
    /// Access key ID (optional, uses default credential chain if absent)
    #[serde(default)]
    pub access_key_id: Option<SecretString>,
    /// Secret access key
    #[serde(default)]
    pub secret_access_key: Option<SecretString>,
    /// Session token for temporary credentials
    #[serde(default)]
    pub session_token: Option<SecretString>,
    /// Register the common chat and image models during init
    #[serde(default)]
    pub define_common_models: bool,
    /// Register the common embedders during init
    #[serde(default)]
    pub define_common_embedders: bool,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            max_retries: default_max_retries(),
            request_timeout: default_request_timeout(),
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            define_common_models: false,
            define_common_embedders: false,
        }
    }
}

impl BedrockConfig {
    /// Parsed per-operation timeout
    ///
    /// # Errors
    ///
    /// Returns an error if `request_timeout` is not a valid duration string
    pub fn request_timeout(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.request_timeout)
            .map_err(|e| anyhow::anyhow!("invalid request_timeout '{}': {e}", self.request_timeout))
    }

    /// Whether explicit credentials replace the default chain
    pub const fn has_static_credentials(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }
}

fn default_region() -> String {
    "us-east-1".to_owned()
}

const fn default_max_retries() -> u32 {
    3
}

fn default_request_timeout() -> String {
    "30s".to_owned()
}
