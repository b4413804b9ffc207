use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml_str(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the retry budget or timeout is zero, or if only
    /// half of a static credential pair is present
    pub fn validate(&self) -> anyhow::Result<()> {
        let bedrock = &self.bedrock;

        if bedrock.region.trim().is_empty() {
            anyhow::bail!("bedrock.region must not be empty");
        }

        if bedrock.max_retries == 0 {
            anyhow::bail!("bedrock.max_retries must be at least 1");
        }

        if bedrock.request_timeout()?.is_zero() {
            anyhow::bail!("bedrock.request_timeout must be greater than 0");
        }

        if bedrock.access_key_id.is_some() != bedrock.secret_access_key.is_some() {
            anyhow::bail!("bedrock.access_key_id and bedrock.secret_access_key must be set together");
        }

        if bedrock.session_token.is_some() && !bedrock.has_static_credentials() {
            anyhow::bail!("bedrock.session_token requires access_key_id and secret_access_key");
        }

        Ok(())
    }
}
