use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::{
    Summarizer, Summary,
    error::SummaryError,
    parse::parse_summary,
    prompt::build_prompt,
    protocol::{ChatMessage, ChatRequest, ChatResponse},
};

/// Summarizer backed by an OpenAI-compatible chat completion API
///
/// Defaults target `OpenRouter`, but any endpoint accepting
/// `POST {base_url}/chat/completions` with a bearer token works.
pub struct ChatCompletionSummarizer {
    client: Client,
    base_url: Url,
    api_key: SecretString,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl ChatCompletionSummarizer {
    /// Create a summarizer with a per-request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(
        base_url: Url,
        api_key: SecretString,
        model: String,
        temperature: f64,
        max_tokens: u32,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build summarization HTTP client: {e}"))?;

        Ok(Self {
            client,
            base_url,
            api_key,
            model,
            temperature,
            max_tokens,
        })
    }

    fn completions_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/chat/completions")
    }
}

#[async_trait]
impl Summarizer for ChatCompletionSummarizer {
    async fn summarize(&self, transcript: &str) -> Result<Summary, SummaryError> {
        let prompt = build_prompt(transcript);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        tracing::debug!(model = %self.model, chars = transcript.chars().count(), "requesting summary");

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "summarization request failed");
                SummaryError::from(e)
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "summarization API responded");

        // anything but a plain 200 carries no completion
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "summarization API returned error");

            return Err(SummaryError::ProviderApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let completion: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| SummaryError::InvalidResponse(format!("failed to parse response: {e}")))?;

        let content = completion
            .into_content()
            .ok_or_else(|| SummaryError::InvalidResponse("response has no message content".to_string()))?;

        tracing::trace!(content = %content, "summarization content");

        Ok(parse_summary(&content))
    }
}
