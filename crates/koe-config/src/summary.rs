use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

/// Environment variable consulted for the API key when none is configured inline
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Summarization client configuration
///
/// Targets any OpenAI-compatible chat completion endpoint; OpenRouter by default.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SummaryConfig {
    /// Set to false to never summarize, even with an API key available
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// API base URL; `/chat/completions` is appended
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Maximum output tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout (e.g. "60s", "1m")
    #[serde(default = "default_timeout")]
    pub timeout: String,
    /// Inline API key; takes precedence over `api_key_env`
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout: default_timeout(),
            api_key: None,
            api_key_env: default_api_key_env(),
        }
    }
}

impl SummaryConfig {
    /// Parsed request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if `timeout` is not a valid duration string
    pub fn timeout_duration(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.timeout).map_err(|e| anyhow::anyhow!("invalid summary timeout '{}': {e}", self.timeout))
    }

    /// Fill in the API key from the environment when none is set inline
    ///
    /// Blank keys, inline or from the environment, count as absent.
    pub fn resolve_api_key(&mut self) {
        if self.api_key.as_ref().is_some_and(|key| !key.expose_secret().trim().is_empty()) {
            return;
        }

        self.api_key = std::env::var(&self.api_key_env)
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .map(SecretString::from);
    }

    /// Whether requests should be summarized at all
    pub fn is_active(&self) -> bool {
        self.enabled && self.api_key.is_some()
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

fn default_base_url() -> Url {
    Url::parse("https://openrouter.ai/api/v1").expect("valid default URL")
}

fn default_model() -> String {
    "deepseek/deepseek-chat".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_temperature() -> f64 {
    0.3
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_tokens() -> u32 {
    2000
}

fn default_timeout() -> String {
    "60s".to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}
