use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::{error::SttError, http_client::http_client};

use super::Transcriber;

/// Whisper server speaking the `OpenAI` transcription API
///
/// Works against whisper.cpp's server, faster-whisper-server and the hosted
/// `OpenAI` endpoint alike.
pub(crate) struct WhisperHttpTranscriber {
    client: Client,
    base_url: Url,
    model: String,
    api_key: Option<SecretString>,
}

impl WhisperHttpTranscriber {
    pub fn new(base_url: Url, model: String, api_key: Option<SecretString>) -> Self {
        Self {
            client: http_client(),
            base_url,
            model,
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/audio/transcriptions", self.base_url.as_str().trim_end_matches('/'))
    }
}

#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("m4a" | "mp4") => "audio/mp4",
        Some("ogg" | "oga" | "opus") => "audio/ogg",
        Some("webm") => "audio/webm",
        Some("flac") => "audio/flac",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl Transcriber for WhisperHttpTranscriber {
    async fn transcribe(&self, audio: &Path, language: &str) -> crate::Result<String> {
        let bytes = tokio::fs::read(audio).await?;

        let file_name = audio
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("audio")
            .to_string();

        tracing::debug!(
            bytes = bytes.len(),
            model = %self.model,
            language,
            "whisper transcription request"
        );

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(content_type_for(audio))
                    .map_err(|e| SttError::InvalidRequest(format!("Invalid content type: {e}")))?,
            )
            .text("model", self.model.clone())
            .text("language", language.to_string())
            .text("response_format", "json");

        let mut request = self.client.post(self.endpoint()).multipart(form);

        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Whisper request failed: {e}");
            SttError::ConnectionError(format!("Failed to send request to whisper server: {e}"))
        })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!("Whisper API error ({status}): {error_text}");

            return Err(match status.as_u16() {
                401 => SttError::AuthenticationFailed(error_text),
                400 => SttError::InvalidRequest(error_text),
                _ => SttError::ProviderApiError {
                    status: status.as_u16(),
                    message: error_text,
                },
            });
        }

        let result: WhisperResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse whisper response: {e}");
            SttError::InternalError(format!("malformed transcription response: {e}"))
        })?;

        tracing::debug!(chars = result.text.chars().count(), "whisper transcription complete");

        Ok(result.text)
    }

    fn name(&self) -> &str {
        "whisper_http"
    }
}
