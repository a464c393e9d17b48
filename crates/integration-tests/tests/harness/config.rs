//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use koe_config::{Config, CorsConfig, ServerConfig, SttConfig, SummaryConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    ///
    /// No summarization key is set, whatever the environment holds.
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    ..ServerConfig::default()
                },
                stt: SttConfig::default(),
                summary: SummaryConfig::default(),
                telemetry: koe_config::TelemetryConfig::default(),
            },
        }
    }

    /// Point the whisper HTTP backend at a mock server
    pub fn with_stt_server(mut self, base_url: &str) -> Self {
        self.config.stt.base_url = base_url.parse().expect("valid URL");
        self
    }

    /// Enable summarization against a mock chat completion API
    pub fn with_summary_api(mut self, base_url: &str) -> Self {
        self.config.summary.base_url = base_url.parse().expect("valid URL");
        self.config.summary.api_key = Some(SecretString::from("test-key"));
        self
    }

    /// Override the summarization timeout (e.g. "200ms")
    pub fn with_summary_timeout(mut self, timeout: &str) -> Self {
        self.config.summary.timeout = timeout.to_owned();
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = config;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Cap upload size in bytes
    pub fn with_max_upload_size(mut self, bytes: usize) -> Self {
        self.config.server.max_upload_size = Some(bytes);
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
