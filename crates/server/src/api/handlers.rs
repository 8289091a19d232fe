use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::metrics::{collect_dynamic_metrics, encode_metrics};
use crate::state::AppState;

use super::error::{ApiError, NOT_FOUND_MESSAGE};

const INDEX_HTML: &str = include_str!("../../static/index.html");
const SCRIPT_JS: &str = include_str!("../../static/script.js");
const STYLE_CSS: &str = include_str!("../../static/style.css");

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct FfmpegStatusResponse {
    pub ffmpeg_available: bool,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Render the UI page, sweeping expired files first when configured to.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<&'static str> {
    if state.config().storage.sweep_on_page_view {
        let report = state.janitor().sweep().await;
        debug!(removed = report.removed_count(), "Page view sweep");
    }
    Html(INDEX_HTML)
}

/// Built-in UI assets, used when no `static_dir` override is configured.
pub async fn static_asset(Path(file): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let (content_type, body) = match file.as_str() {
        "script.js" => ("text/javascript; charset=utf-8", SCRIPT_JS),
        "style.css" => ("text/css; charset=utf-8", STYLE_CSS),
        _ => return Err(ApiError::not_found(NOT_FOUND_MESSAGE)),
    };
    Ok(([(header::CONTENT_TYPE, content_type)], body))
}

pub async fn ffmpeg_status(State(state): State<Arc<AppState>>) -> Json<FfmpegStatusResponse> {
    Json(FfmpegStatusResponse {
        ffmpeg_available: state.service().is_available().await,
    })
}

/// Prometheus text exposition.
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    collect_dynamic_metrics(&state).await;
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
