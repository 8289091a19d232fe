//! Delivery of converted files.

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{error, info, warn};
use wavswap_core::{StorageArea, StorageError};

use super::error::ApiError;
use crate::state::AppState;

const FILE_NOT_FOUND: &str = "File not found";
const DOWNLOAD_ERROR: &str = "Error during download";

/// Stream a converted file from the outgoing area as an attachment.
///
/// Only flat names are looked up; anything that could address another
/// directory is reported as missing.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    request: Request,
) -> Result<Response, ApiError> {
    let path = match state
        .service()
        .store()
        .locate(StorageArea::Outgoing, &filename)
        .await
    {
        Ok(Some(path)) => path,
        Ok(None) => {
            warn!(file = %filename, "Download requested for missing file");
            return Err(ApiError::not_found(FILE_NOT_FOUND));
        }
        Err(StorageError::InvalidName { name }) => {
            warn!(file = %name, "Download requested with invalid name");
            return Err(ApiError::not_found(FILE_NOT_FOUND));
        }
        Err(e) => {
            error!(file = %filename, error = %e, "Error during download");
            return Err(ApiError::internal(DOWNLOAD_ERROR));
        }
    };

    let response = match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response,
        Err(e) => {
            error!(file = %filename, error = %e, "Error during download");
            return Err(ApiError::internal(DOWNLOAD_ERROR));
        }
    };

    // Swept between lookup and open
    if response.status() == StatusCode::NOT_FOUND {
        return Err(ApiError::not_found(FILE_NOT_FOUND));
    }

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .map_err(|e| {
            error!(file = %filename, error = %e, "Unusable download name");
            ApiError::internal(DOWNLOAD_ERROR)
        })?;

    let mut response = response.map(Body::new);
    response
        .headers_mut()
        .insert(header::CONTENT_DISPOSITION, disposition);

    info!(file = %filename, "Serving download");
    Ok(response)
}
