//! Upload and conversion handler.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;
use wavswap_core::{UploadRequest, UploadedFile};

use super::error::ApiError;
use crate::state::AppState;

const SUCCESS_MESSAGE: &str = "Conversion successful!";

/// Response for a successful conversion
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub success: bool,
    pub message: String,
    pub download_url: String,
    pub converted_filename: String,
}

/// Convert an uploaded WAV or MP3 file.
///
/// Form fields: `file` (required) and `conversion_type` (`wav2mp3` or
/// `mp32wav`, default `wav2mp3`). Unknown fields are ignored, as is a
/// `file` field sent without a filename.
pub async fn convert(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ConvertResponse>, ApiError> {
    // refuse before buffering the body
    state.service().ensure_available().await?;

    let mut multipart = match multipart {
        Ok(m) => m,
        Err(e) => {
            warn!(error = %e, "Request is not a multipart form");
            return Err(ApiError::bad_request("No file part"));
        }
    };

    let mut request = UploadRequest::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(multipart_error(&state, e)),
        };

        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let Some(filename) = field.file_name().map(str::to_string) else {
                    warn!("Ignoring file field without a filename");
                    continue;
                };
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(&state, e))?;
                request.file = Some(UploadedFile {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            "conversion_type" => {
                let text = field.text().await.map_err(|e| multipart_error(&state, e))?;
                request.conversion_type = Some(text);
            }
            _ => {}
        }
    }

    let outcome = state.service().convert(request).await?;

    Ok(Json(ConvertResponse {
        success: true,
        message: SUCCESS_MESSAGE.to_string(),
        download_url: outcome.download_url,
        converted_filename: outcome.converted_filename,
    }))
}

fn multipart_error(state: &AppState, err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        let label = state.config().storage.max_upload_label();
        warn!("Upload rejected: body exceeds {}", label);
        return ApiError::payload_too_large(&label);
    }
    warn!(error = %err, "Malformed multipart body");
    ApiError::new(err.status(), err.body_text())
}
