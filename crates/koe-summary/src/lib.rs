//! Transcript summarization through a chat completion API

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod client;
mod error;
mod parse;
mod prompt;
mod protocol;

use std::sync::Arc;

use async_trait::async_trait;
use koe_config::SummaryConfig;

pub use client::ChatCompletionSummarizer;
pub use error::SummaryError;
pub use parse::{parse_summary, strip_code_fence};
pub use prompt::build_prompt;

/// Summary of a transcript
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Short overall summary
    pub summary: Option<String>,
    /// Important points, in the order the model listed them
    pub key_points: Vec<String>,
}

/// Produces a [`Summary`] from transcript text
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, transcript: &str) -> Result<Summary, SummaryError>;
}

/// Build the configured summarizer
///
/// Returns `None` when summarization is disabled or no API key was found,
/// in which case requests are answered without a summary.
pub fn build_summarizer(config: &SummaryConfig) -> anyhow::Result<Option<Arc<dyn Summarizer>>> {
    let api_key = match &config.api_key {
        Some(api_key) if config.is_active() => api_key.clone(),
        Some(_) => {
            tracing::info!("summarization disabled");
            return Ok(None);
        }
        None => {
            tracing::warn!(
                env = %config.api_key_env,
                "no summarization API key found, transcripts will not be summarized"
            );
            return Ok(None);
        }
    };

    let summarizer = ChatCompletionSummarizer::new(
        config.base_url.clone(),
        api_key,
        config.model.clone(),
        config.temperature,
        config.max_tokens,
        config.timeout_duration()?,
    )?;

    tracing::info!(model = %config.model, base_url = %config.base_url, "summarization enabled");

    Ok(Some(Arc::new(summarizer)))
}
