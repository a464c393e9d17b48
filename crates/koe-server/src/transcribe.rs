use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use bytes::Bytes;
use koe_summary::{Summarizer, Summary};
use serde::Serialize;
use stt::Transcriber;

use crate::{audio_file::AudioFile, error::TranscribeError};

/// Characters of the transcript echoed to the log
const PREVIEW_CHARS: usize = 100;

/// Shared state of the transcription route
#[derive(Clone)]
pub(crate) struct TranscribeState {
    pub transcriber: Arc<dyn Transcriber>,
    pub summarizer: Option<Arc<dyn Summarizer>>,
    pub language: Arc<str>,
}

/// Successful `/transcribe` response
#[derive(Debug, Serialize)]
pub(crate) struct TranscribeResponse {
    success: bool,
    transcription: String,
    summary: Option<String>,
    key_points: Vec<String>,
    filename: String,
}

struct Upload {
    filename: String,
    bytes: Bytes,
}

/// Read the `file` field; other fields are ignored
///
/// A `file` field sent as a plain form value, without a filename, is not an
/// upload.
async fn read_upload(multipart: &mut Multipart) -> Result<Upload, TranscribeError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let Some(filename) = field.file_name().map(str::to_string) else {
            return Err(TranscribeError::MissingFile);
        };
        let bytes = field.bytes().await?;

        return Ok(Upload { filename, bytes });
    }

    Err(TranscribeError::MissingFile)
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

/// Transcribe an uploaded audio file and summarize the result
pub(crate) async fn transcribe_handler(
    State(state): State<TranscribeState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscribeResponse>, TranscribeError> {
    let mut multipart = multipart?;
    let upload = read_upload(&mut multipart).await?;

    tracing::info!(filename = %upload.filename, bytes = upload.bytes.len(), "upload received");

    let audio = AudioFile::persist(&upload.filename, upload.bytes).await?;
    tracing::debug!(path = %audio.path().display(), "saved upload to temporary file");

    let result = state.transcriber.transcribe(audio.path(), &state.language).await;

    if let Err(e) = audio.close() {
        tracing::warn!("failed to remove temporary audio file: {e}");
    }

    let transcription = result?.trim().to_string();

    tracing::info!(
        backend = state.transcriber.name(),
        chars = transcription.chars().count(),
        preview = %preview(&transcription),
        "transcription complete"
    );

    if transcription.is_empty() {
        return Err(TranscribeError::EmptyTranscript);
    }

    let summary = match &state.summarizer {
        Some(summarizer) => match summarizer.summarize(&transcription).await {
            Ok(summary) => {
                tracing::info!(
                    summary_chars = summary.summary.as_deref().map_or(0, |s| s.chars().count()),
                    key_points = summary.key_points.len(),
                    "summary received"
                );
                summary
            }
            Err(e) => {
                tracing::warn!("summarization failed, responding without summary: {e}");
                Summary::default()
            }
        },
        None => {
            tracing::debug!("summarization skipped: no API key configured");
            Summary::default()
        }
    };

    Ok(Json(TranscribeResponse {
        success: true,
        transcription,
        summary: summary.summary,
        key_points: summary.key_points,
        filename: upload.filename,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_counts_characters() {
        let text = "あ".repeat(150);
        let shown = preview(&text);

        assert_eq!(shown.chars().count(), 100);
        assert_eq!(preview("short"), "short");
    }
}
