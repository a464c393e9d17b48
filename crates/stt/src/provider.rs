#[cfg(feature = "local-whisper")]
pub(crate) mod local;
pub(crate) mod whisper_http;

use std::path::Path;

use async_trait::async_trait;

/// Speech-to-text backend
///
/// One instance is built at startup and shared by every request, so
/// implementations must tolerate concurrent calls.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio file at `audio` using `language` as a hint
    ///
    /// The file extension reflects the uploaded format and may be used for
    /// format detection.
    async fn transcribe(&self, audio: &Path, language: &str) -> crate::Result<String>;

    /// Backend name for logs
    fn name(&self) -> &str;
}
