use thiserror::Error;

pub type Result<T> = std::result::Result<T, SttError>;

/// Speech-to-text errors
#[derive(Debug, Error)]
pub enum SttError {
    /// The backend rejected the request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication with the transcription server failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Transcription server returned an unexpected status
    #[error("Provider API error ({status}): {message}")]
    ProviderApiError { status: u16, message: String },

    /// Network or connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Model could not be loaded or inference failed
    #[error("Model error: {0}")]
    ModelError(String),

    /// Audio could not be decoded into samples
    #[error("Audio decode error: {0}")]
    AudioDecode(String),

    /// Reading the audio file failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal error (blocking task failure, malformed response)
    #[error("Internal error: {0}")]
    InternalError(String),
}
