use std::path::PathBuf;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Speech-to-text configuration
///
/// One backend is loaded at startup and shared by every request.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SttConfig {
    /// Language hint passed with every transcription (ISO 639-1)
    #[serde(default = "default_language")]
    pub language: String,
    /// Backend type
    #[serde(rename = "type", default)]
    pub provider_type: SttProviderType,
    /// Base URL of an OpenAI-compatible transcription server (`whisper_http`)
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Model name sent to the transcription server (`whisper_http`)
    #[serde(default = "default_model")]
    pub model: String,
    /// Optional bearer token for the transcription server (`whisper_http`)
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Path to a GGML Whisper model (`local`)
    #[serde(default)]
    pub model_path: Option<PathBuf>,
    /// Decoder threads for the local model; defaults to available parallelism
    #[serde(default)]
    pub threads: Option<u16>,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            provider_type: SttProviderType::default(),
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            model_path: None,
            threads: None,
        }
    }
}

/// Supported STT backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SttProviderType {
    /// Whisper behind an OpenAI-compatible `/audio/transcriptions` endpoint
    #[default]
    WhisperHttp,
    /// Whisper model loaded in-process (requires the `local-whisper` feature)
    Local,
}

fn default_language() -> String {
    "ja".to_string()
}

fn default_base_url() -> Url {
    Url::parse("http://127.0.0.1:9000/v1").expect("valid default URL")
}

fn default_model() -> String {
    "medium".to_string()
}
