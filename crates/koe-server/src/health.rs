use axum::{Json, response::IntoResponse};
use http::StatusCode;
use serde_json::json;

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Service banner on `/`
pub async fn root_handler() -> impl IntoResponse {
    Json(json!({ "message": "audio transcription server" }))
}
