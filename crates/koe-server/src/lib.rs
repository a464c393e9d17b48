//! HTTP surface of koe: upload audio, get a transcript and a summary back

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod audio_file;
mod cors;
mod error;
mod health;
mod transcribe;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use koe_config::{Config, ServerConfig};
use stt::Transcriber;
use tower_http::trace::TraceLayer;

pub use error::TranscribeError;

use transcribe::TranscribeState;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// Loads the transcription backend (on the blocking pool, since a local
    /// model may take a while) and the summarizer.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let stt_config = config.stt.clone();
        let transcriber = tokio::task::spawn_blocking(move || stt::build_transcriber(&stt_config))
            .await
            .map_err(|e| anyhow::anyhow!("transcription backend initialization failed: {e}"))??;

        Self::with_transcriber(config, transcriber)
    }

    /// Build the server around an already constructed transcriber
    pub fn with_transcriber(config: Config, transcriber: Arc<dyn Transcriber>) -> anyhow::Result<Self> {
        let summarizer = koe_summary::build_summarizer(&config.summary)?;

        let state = TranscribeState {
            transcriber,
            summarizer,
            language: Arc::from(config.stt.language.as_str()),
        };

        Ok(Self {
            router: build_router(&config.server, state),
            listen_address: config.server.listen_address(),
        })
    }

    /// Get the configured listen address
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}

fn build_router(config: &ServerConfig, state: TranscribeState) -> Router {
    let body_limit = config
        .max_upload_size
        .map_or_else(DefaultBodyLimit::disable, DefaultBodyLimit::max);

    let mut app = Router::new().route("/", get(health::root_handler)).route(
        "/transcribe",
        post(transcribe::transcribe_handler).layer(body_limit),
    );

    if config.health.enabled {
        app = app.route(&config.health.path, get(health::health_handler));
    }

    let mut app = app.with_state(state).layer(TraceLayer::new_for_http());

    if config.cors.enabled {
        app = app.layer(cors::cors_layer(&config.cors));
    }

    app
}
