//! Mock upstream APIs for integration tests
//!
//! Serves a minimal OpenAI-compatible chat completion endpoint (the
//! summarizer's upstream) and audio transcription endpoint (the whisper
//! server) with canned, configurable responses.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Default summarization answer, fenced the way chat models tend to reply
pub const DEFAULT_SUMMARY_CONTENT: &str =
    "```json\n{\"summary\": \"会議の要約です\", \"key_points\": [\"予算の確認\", \"次回の日程\"]}\n```";

/// Default transcript returned by the transcription endpoint
pub const DEFAULT_TRANSCRIPT: &str = " 本日の会議を始めます。 ";

/// Behaviour of the mock
#[derive(Clone)]
pub struct MockOptions {
    /// Message content of the chat completion
    pub summary_content: String,
    /// Status returned by the chat completion endpoint
    pub chat_status: StatusCode,
    /// Delay before answering chat completions
    pub chat_delay: Option<Duration>,
    /// Text returned by the transcription endpoint
    pub transcript: String,
    /// Status returned by the transcription endpoint
    pub transcription_status: StatusCode,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            summary_content: DEFAULT_SUMMARY_CONTENT.to_owned(),
            chat_status: StatusCode::OK,
            chat_delay: None,
            transcript: DEFAULT_TRANSCRIPT.to_owned(),
            transcription_status: StatusCode::OK,
        }
    }
}

/// Upload as seen by the transcription endpoint
#[derive(Debug, Clone, Default)]
pub struct ReceivedAudio {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
    pub language: Option<String>,
    pub model: Option<String>,
}

/// Mock upstream server
pub struct MockUpstream {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    options: MockOptions,
    chat_count: AtomicU32,
    transcription_count: AtomicU32,
    last_chat_request: Mutex<Option<Value>>,
    last_chat_authorization: Mutex<Option<String>>,
    last_audio: Mutex<Option<ReceivedAudio>>,
}

impl MockUpstream {
    /// Start the mock with default responses
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(MockOptions::default()).await
    }

    /// Start a mock whose chat completion answers with `content`
    pub async fn start_with_summary(content: &str) -> anyhow::Result<Self> {
        Self::start_with(MockOptions {
            summary_content: content.to_owned(),
            ..MockOptions::default()
        })
        .await
    }

    /// Start a mock whose transcription endpoint returns `transcript`
    pub async fn start_with_transcript(transcript: &str) -> anyhow::Result<Self> {
        Self::start_with(MockOptions {
            transcript: transcript.to_owned(),
            ..MockOptions::default()
        })
        .await
    }

    pub async fn start_with(options: MockOptions) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            options,
            chat_count: AtomicU32::new(0),
            transcription_count: AtomicU32::new(0),
            last_chat_request: Mutex::new(None),
            last_chat_authorization: Mutex::new(None),
            last_audio: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
            .route("/v1/audio/transcriptions", routing::post(handle_transcriptions))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as an upstream
    ///
    /// Includes `/v1` since clients append paths like `/chat/completions`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of chat completion requests received
    pub fn chat_count(&self) -> u32 {
        self.state.chat_count.load(Ordering::Relaxed)
    }

    /// Number of transcription requests received
    pub fn transcription_count(&self) -> u32 {
        self.state.transcription_count.load(Ordering::Relaxed)
    }

    /// Body of the most recent chat completion request
    pub fn last_chat_request(&self) -> Option<Value> {
        self.state.last_chat_request.lock().unwrap().clone()
    }

    /// Authorization header of the most recent chat completion request
    pub fn last_chat_authorization(&self) -> Option<String> {
        self.state.last_chat_authorization.lock().unwrap().clone()
    }

    /// Most recent upload received by the transcription endpoint
    pub fn last_audio(&self) -> Option<ReceivedAudio> {
        self.state.last_audio.lock().unwrap().clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_chat_completions(
    State(state): State<Arc<MockState>>,
    headers: axum::http::HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.chat_count.fetch_add(1, Ordering::Relaxed);

    *state.last_chat_authorization.lock().unwrap() = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    *state.last_chat_request.lock().unwrap() = Some(body.clone());

    if let Some(delay) = state.options.chat_delay {
        tokio::time::sleep(delay).await;
    }

    if !state.options.chat_status.is_success() {
        return (state.options.chat_status, "mock upstream failure").into_response();
    }

    Json(json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "created": 0,
        "model": body["model"],
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": state.options.summary_content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 10, "total_tokens": 20 }
    }))
    .into_response()
}

async fn handle_transcriptions(State(state): State<Arc<MockState>>, mut multipart: Multipart) -> Response {
    state.transcription_count.fetch_add(1, Ordering::Relaxed);

    let mut received = ReceivedAudio::default();

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();

        match name.as_str() {
            "file" => {
                received.file_name = field.file_name().map(str::to_owned);
                received.bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
            }
            "language" => received.language = field.text().await.ok(),
            "model" => received.model = field.text().await.ok(),
            _ => {}
        }
    }

    *state.last_audio.lock().unwrap() = Some(received);

    if !state.options.transcription_status.is_success() {
        return (
            state.options.transcription_status,
            Json(json!({ "error": { "message": "mock transcription failure" } })),
        )
            .into_response();
    }

    Json(json!({ "text": state.options.transcript })).into_response()
}
