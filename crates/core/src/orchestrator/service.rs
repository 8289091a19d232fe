//! The conversion orchestrator.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::error::ConversionServiceError;
use super::types::{download_url, ConversionOutcome, ConversionStage, UploadRequest};
use crate::converter::{AudioConverter, AudioFormat, ConversionDirection, ConversionJob};
use crate::metrics::{
    CONVERSIONS_TOTAL, CONVERSION_DURATION, ROLLBACK_FAILURES_TOTAL, UPLOAD_BYTES_TOTAL,
};
use crate::storage::{new_token, AssetStore, StorageArea, StorageError, StoredAsset};
use crate::validator;

/// Handles conversion requests end to end.
///
/// Holds no per-request state: every request gets a fresh token and the
/// filesystem is the only thing shared between requests.
pub struct ConversionService {
    converter: Arc<dyn AudioConverter>,
    store: Arc<dyn AssetStore>,
}

impl ConversionService {
    pub fn new(converter: Arc<dyn AudioConverter>, store: Arc<dyn AssetStore>) -> Self {
        Self { converter, store }
    }

    pub fn converter(&self) -> &dyn AudioConverter {
        self.converter.as_ref()
    }

    pub fn store(&self) -> &dyn AssetStore {
        self.store.as_ref()
    }

    /// Whether the conversion engine can currently be run.
    pub async fn is_available(&self) -> bool {
        self.converter.is_available().await
    }

    /// Refuses with [`ConversionServiceError::ServiceUnavailable`] when the
    /// engine is missing, before any upload body has been read.
    pub async fn ensure_available(&self) -> Result<(), ConversionServiceError> {
        if self.converter.is_available().await {
            return Ok(());
        }
        warn!(converter = self.converter.name(), "Conversion engine unavailable");
        let err = ConversionServiceError::ServiceUnavailable;
        CONVERSIONS_TOTAL
            .with_label_values(&["unknown", err.kind()])
            .inc();
        Err(err)
    }

    /// Validates, stores, and converts one upload.
    pub async fn convert(
        &self,
        request: UploadRequest,
    ) -> Result<ConversionOutcome, ConversionServiceError> {
        let direction_label = match request.conversion_type.as_deref() {
            None | Some("") => ConversionDirection::default().as_str(),
            Some(raw) => raw
                .parse::<ConversionDirection>()
                .map(|d| d.as_str())
                .unwrap_or("unknown"),
        };

        let result = self.process(request).await;

        match &result {
            Ok(outcome) => {
                CONVERSIONS_TOTAL
                    .with_label_values(&[outcome.direction.as_str(), "success"])
                    .inc();
            }
            Err(e) => {
                CONVERSIONS_TOTAL
                    .with_label_values(&[direction_label, e.kind()])
                    .inc();
            }
        }

        result
    }

    async fn process(
        &self,
        request: UploadRequest,
    ) -> Result<ConversionOutcome, ConversionServiceError> {
        debug!(stage = %ConversionStage::Received, "Conversion request");

        if !self.converter.is_available().await {
            warn!(converter = self.converter.name(), "Conversion engine unavailable");
            return Err(ConversionServiceError::ServiceUnavailable);
        }

        let Some(file) = request.file else {
            warn!("No file part in the request");
            return Err(ConversionServiceError::bad_request("No file part"));
        };

        if file.filename.is_empty() {
            warn!("No file selected");
            return Err(ConversionServiceError::bad_request("No file selected"));
        }

        let direction = match request.conversion_type.as_deref() {
            None | Some("") => ConversionDirection::default(),
            Some(raw) => raw.parse::<ConversionDirection>().map_err(|e| {
                warn!(conversion_type = raw, "Invalid conversion type");
                ConversionServiceError::bad_request(e.to_string())
            })?,
        };

        if !validator::is_allowed(&file.filename) {
            warn!(filename = %file.filename, "Invalid file type");
            return Err(ConversionServiceError::bad_request(
                "File type not allowed. Please upload a WAV or MP3 file.",
            ));
        }

        let base_name = validator::sanitize_filename(&file.filename);
        if base_name.is_empty() {
            warn!(filename = %file.filename, "Filename empty after sanitization");
            return Err(ConversionServiceError::bad_request("Invalid filename"));
        }

        debug!(stage = %ConversionStage::Validated, filename = %base_name, %direction);

        let token = new_token();
        let incoming = match self
            .store
            .put(StorageArea::Incoming, &token, &base_name, &file.bytes)
            .await
        {
            Ok(asset) => asset,
            Err(e) => {
                error!(id = %token, error = %e, "Failed to store upload");
                // A failed write may still have left a partial file behind
                if !matches!(e, StorageError::AlreadyExists { .. }) {
                    self.discard(StorageArea::Incoming, &token, &base_name).await;
                }
                return Err(e.into());
            }
        };

        UPLOAD_BYTES_TOTAL.inc_by(file.bytes.len() as u64);
        info!(
            stage = %ConversionStage::Stored,
            id = %token,
            "File uploaded: {} ({} bytes)",
            base_name,
            file.bytes.len()
        );

        match self.convert_stored(&incoming, direction).await {
            Ok(outcome) => {
                info!(
                    stage = %ConversionStage::Succeeded,
                    id = %token,
                    "Conversion successful ({}): {}",
                    direction,
                    outcome.converted_filename
                );
                Ok(outcome)
            }
            Err(e) => {
                error!(
                    stage = %ConversionStage::Failed,
                    id = %token,
                    kind = e.kind(),
                    "Error during conversion: {}",
                    e
                );
                self.discard(StorageArea::Incoming, &incoming.token, &incoming.base_name)
                    .await;
                Err(e)
            }
        }
    }

    async fn convert_stored(
        &self,
        incoming: &StoredAsset,
        direction: ConversionDirection,
    ) -> Result<ConversionOutcome, ConversionServiceError> {
        // Trust the sanitized name, not the client's declared content type
        let extension = validator::extension(&incoming.base_name).unwrap_or_default();
        if AudioFormat::from_extension(&extension) != Some(direction.source_format()) {
            return Err(ConversionServiceError::Validation(format!(
                "File type ({}) doesn't match conversion type ({})",
                extension, direction
            )));
        }

        let target = direction.target_format();
        let converted_filename = format!(
            "{}.{}",
            validator::stem(&incoming.base_name),
            target.extension()
        );
        let outgoing = self
            .store
            .reserve(StorageArea::Outgoing, &incoming.token, &converted_filename)?;

        debug!(stage = %ConversionStage::Converting, id = %incoming.token, output = ?outgoing.path);

        let job = ConversionJob {
            job_id: incoming.token.clone(),
            input_path: incoming.path.clone(),
            output_path: outgoing.path.clone(),
            direction,
        };

        let output = match self.converter.convert(job).await {
            Ok(output) => output,
            Err(e) => {
                self.discard(StorageArea::Outgoing, &outgoing.token, &outgoing.base_name)
                    .await;
                return Err(e.into());
            }
        };

        CONVERSION_DURATION
            .with_label_values(&[direction.as_str()])
            .observe(output.duration_ms as f64 / 1000.0);

        let stored_name = outgoing.name();
        Ok(ConversionOutcome {
            token: incoming.token.clone(),
            direction,
            output_format: target,
            download_url: download_url(&stored_name),
            converted_filename,
            stored_name,
            output_size_bytes: output.output_size_bytes,
            duration_ms: output.duration_ms,
        })
    }

    /// Best-effort removal of `{token}_{base_name}`. Failures are logged only.
    async fn discard(&self, area: StorageArea, token: &str, base_name: &str) {
        let name = crate::storage::asset_name(token, base_name);
        match self.store.remove(area, &name).await {
            Ok(()) => debug!(area = %area, file = %name, "Removed asset after failure"),
            Err(StorageError::NotFound { .. }) => {}
            Err(e) => {
                ROLLBACK_FAILURES_TOTAL.inc();
                warn!(area = %area, file = %name, error = %e, "Failed to remove asset after failure");
            }
        }
    }
}
