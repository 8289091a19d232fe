use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir, trace::TraceLayer};

use super::middleware::{handle_panic, metrics_middleware};
use super::{convert, download, error, handlers};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config().server.static_dir.clone();
    let max_upload_bytes = state.config().storage.max_upload_bytes;

    // UI
    let ui = Router::new().route("/", get(handlers::index));
    let ui = match static_dir {
        Some(dir) => ui.nest_service("/static", ServeDir::new(dir)),
        None => ui.route("/static/{file}", get(handlers::static_asset)),
    };

    ui
        // Conversion
        .route("/ffmpeg-status", get(handlers::ffmpeg_status))
        .route("/convert", post(convert::convert))
        .route("/download/{filename}", get(download::download))
        // Operations
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .fallback(error::not_found)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}
