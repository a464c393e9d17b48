use std::path::Path;

use crate::{Config, SttProviderType};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, deserializes,
    /// resolves the summarization API key and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let mut config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.summary.resolve_api_key();
        config.validate()?;

        Ok(config)
    }

    /// Build the default configuration with the API key taken from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the defaults fail validation
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        config.summary.resolve_api_key();
        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_server_config()?;
        self.validate_stt_config()?;
        self.validate_summary_config()?;
        Ok(())
    }

    fn validate_server_config(&self) -> anyhow::Result<()> {
        if self.server.max_upload_size == Some(0) {
            anyhow::bail!("server.max_upload_size must be greater than 0");
        }

        if self.server.health.enabled && !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        if self.server.health.enabled && matches!(self.server.health.path.as_str(), "/" | "/transcribe") {
            anyhow::bail!("server.health.path '{}' collides with a built-in route", self.server.health.path);
        }

        Ok(())
    }

    fn validate_stt_config(&self) -> anyhow::Result<()> {
        let stt = &self.stt;

        if stt.language.trim().is_empty() {
            anyhow::bail!("stt.language must not be empty");
        }

        match stt.provider_type {
            SttProviderType::WhisperHttp => {
                if !matches!(stt.base_url.scheme(), "http" | "https") {
                    anyhow::bail!("stt.base_url must use http or https");
                }

                if stt.model.trim().is_empty() {
                    anyhow::bail!("stt.model must not be empty");
                }
            }
            SttProviderType::Local => {
                let has_model = stt.model_path.as_ref().is_some_and(|p| !p.as_os_str().is_empty());
                if !has_model {
                    anyhow::bail!("stt.model_path is required for the local backend");
                }

                if stt.threads == Some(0) {
                    anyhow::bail!("stt.threads must be greater than 0");
                }
            }
        }

        Ok(())
    }

    fn validate_summary_config(&self) -> anyhow::Result<()> {
        let summary = &self.summary;

        if !matches!(summary.base_url.scheme(), "http" | "https") {
            anyhow::bail!("summary.base_url must use http or https");
        }

        if summary.model.trim().is_empty() {
            anyhow::bail!("summary.model must not be empty");
        }

        if !(0.0..=2.0).contains(&summary.temperature) {
            anyhow::bail!("summary.temperature must be between 0.0 and 2.0");
        }

        if summary.max_tokens == 0 {
            anyhow::bail!("summary.max_tokens must be greater than 0");
        }

        if summary.timeout_duration()?.is_zero() {
            anyhow::bail!("summary.timeout must be greater than 0");
        }

        Ok(())
    }
}
