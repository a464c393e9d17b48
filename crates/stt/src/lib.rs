#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
mod http_client;
mod provider;

use std::sync::Arc;

use koe_config::{SttConfig, SttProviderType};

pub use error::{Result, SttError};
pub use provider::Transcriber;

use provider::whisper_http::WhisperHttpTranscriber;

/// Build the configured transcription backend
///
/// Local models are loaded here, once, before the server starts accepting
/// requests.
///
/// # Errors
///
/// Returns an error if the backend cannot be initialized, or if the local
/// backend is selected in a build without the `local-whisper` feature
pub fn build_transcriber(config: &SttConfig) -> anyhow::Result<Arc<dyn Transcriber>> {
    let transcriber: Arc<dyn Transcriber> = match config.provider_type {
        SttProviderType::WhisperHttp => {
            tracing::debug!(base_url = %config.base_url, model = %config.model, "initializing whisper HTTP backend");

            Arc::new(WhisperHttpTranscriber::new(
                config.base_url.clone(),
                config.model.clone(),
                config.api_key.clone(),
            ))
        }
        SttProviderType::Local => build_local(config)?,
    };

    tracing::info!(backend = transcriber.name(), language = %config.language, "transcription backend ready");

    Ok(transcriber)
}

#[cfg(feature = "local-whisper")]
fn build_local(config: &SttConfig) -> anyhow::Result<Arc<dyn Transcriber>> {
    let model_path = config
        .model_path
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("stt.model_path is required for the local backend"))?;

    let transcriber = provider::local::LocalWhisperTranscriber::load(model_path, config.threads)
        .map_err(|e| anyhow::anyhow!("Failed to initialize local whisper model: {e}"))?;

    Ok(Arc::new(transcriber))
}

#[cfg(not(feature = "local-whisper"))]
fn build_local(_config: &SttConfig) -> anyhow::Result<Arc<dyn Transcriber>> {
    anyhow::bail!("the local STT backend requires building with the `local-whisper` feature")
}
