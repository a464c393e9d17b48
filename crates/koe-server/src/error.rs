use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Failures of a `/transcribe` request
#[derive(Debug, Error)]
pub enum TranscribeError {
    /// The audio decoded to nothing but whitespace
    #[error("音声の解析に失敗しました")]
    EmptyTranscript,

    /// No multipart file part named `file`
    #[error("missing required 'file' field")]
    MissingFile,

    /// The body is not a readable multipart form
    #[error("{message}")]
    InvalidUpload { status: StatusCode, message: String },

    /// The transcription backend failed
    #[error(transparent)]
    Transcription(#[from] stt::SttError),

    /// Storing the upload on disk failed
    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

impl TranscribeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyTranscript => StatusCode::BAD_REQUEST,
            Self::MissingFile => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidUpload { status, .. } => *status,
            Self::Transcription(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MultipartError> for TranscribeError {
    fn from(error: MultipartError) -> Self {
        Self::InvalidUpload {
            status: error.status(),
            message: error.body_text(),
        }
    }
}

impl From<MultipartRejection> for TranscribeError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::InvalidUpload {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for TranscribeError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "transcription failed: {self}");
        } else {
            tracing::warn!(status = status.as_u16(), "transcription request rejected: {self}");
        }

        (status, Json(ErrorResponse { detail: self.to_string() })).into_response()
    }
}
