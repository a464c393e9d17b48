#![allow(clippy::must_use_candidate)]

pub mod cors;
mod env;
mod loader;
pub mod server;
pub mod stt;
pub mod summary;
pub mod telemetry;

use serde::Deserialize;

pub use cors::*;
pub use server::*;
pub use stt::*;
pub use summary::*;
pub use telemetry::*;

/// Top-level koe configuration
///
/// Every section is optional; an empty file (or no file at all) yields a
/// server that listens on `0.0.0.0:8000`, transcribes Japanese audio and
/// summarizes through OpenRouter when `OPENROUTER_API_KEY` is set.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Speech-to-text backend configuration
    #[serde(default)]
    pub stt: SttConfig,
    /// Summarization client configuration
    #[serde(default)]
    pub summary: SummaryConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
