use thiserror::Error;

/// Errors from a summarization request
///
/// None of these reach the HTTP client; the request handler logs them and
/// responds without a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The request did not complete within the configured timeout
    #[error("API request timeout")]
    Timeout,

    /// The API answered with a non-success status
    #[error("API error {status}: {message}")]
    ProviderApiError { status: u16, message: String },

    /// The request could not be sent or the connection dropped
    #[error("connection error: {0}")]
    ConnectionError(String),

    /// The API answered 2xx but not with a usable chat completion
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for SummaryError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::ConnectionError(error.to_string())
        }
    }
}
