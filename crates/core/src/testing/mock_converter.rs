//! Mock converter for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::converter::{AudioConverter, ConversionJob, ConversionOutput, ConverterError};

/// A recorded conversion job for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedConversion {
    /// The job that was submitted.
    pub job: ConversionJob,
    /// Whether the conversion succeeded.
    pub success: bool,
}

/// Mock implementation of the AudioConverter trait.
///
/// Provides controllable behavior for testing:
/// - Toggle availability
/// - Track conversion jobs for assertions
/// - Simulate failures, optionally after writing a partial output
/// - Control the bytes written as output
///
/// Without configured output bytes, the output is the input prefixed with
/// `converted:`.
///
/// # Example
///
/// ```rust,ignore
/// use wavswap_core::testing::MockConverter;
///
/// let converter = MockConverter::new();
/// converter.set_next_error(ConverterError::conversion_failed("boom", None)).await;
///
/// let result = service.convert(request).await;
/// assert!(result.is_err());
/// assert_eq!(converter.conversion_count().await, 1);
/// ```
#[derive(Debug)]
pub struct MockConverter {
    /// Recorded conversions.
    conversions: Arc<RwLock<Vec<RecordedConversion>>>,
    /// Result of `is_available`.
    available: Arc<RwLock<bool>>,
    /// If set, the next conversion will fail with this error.
    next_error: Arc<RwLock<Option<ConverterError>>>,
    /// Write the output file before failing with `next_error`.
    partial_output_on_error: Arc<RwLock<bool>>,
    /// Bytes written to the output file.
    output_bytes: Arc<RwLock<Option<Vec<u8>>>>,
    /// Simulated conversion duration in milliseconds.
    conversion_duration_ms: Arc<RwLock<u64>>,
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConverter {
    /// Create a new, available mock converter.
    pub fn new() -> Self {
        Self {
            conversions: Arc::new(RwLock::new(Vec::new())),
            available: Arc::new(RwLock::new(true)),
            next_error: Arc::new(RwLock::new(None)),
            partial_output_on_error: Arc::new(RwLock::new(false)),
            output_bytes: Arc::new(RwLock::new(None)),
            conversion_duration_ms: Arc::new(RwLock::new(0)),
        }
    }

    /// Create a mock that reports the engine as missing.
    pub fn unavailable() -> Self {
        Self {
            available: Arc::new(RwLock::new(false)),
            ..Self::new()
        }
    }

    /// Get all recorded conversions.
    pub async fn recorded_conversions(&self) -> Vec<RecordedConversion> {
        self.conversions.read().await.clone()
    }

    /// Get the number of conversions attempted.
    pub async fn conversion_count(&self) -> usize {
        self.conversions.read().await.len()
    }

    /// Set the result of `is_available`.
    pub async fn set_available(&self, available: bool) {
        *self.available.write().await = available;
    }

    /// Configure the next conversion to fail with the given error.
    pub async fn set_next_error(&self, error: ConverterError) {
        *self.next_error.write().await = Some(error);
    }

    /// Write the output file before returning the configured error.
    pub async fn set_partial_output_on_error(&self, enabled: bool) {
        *self.partial_output_on_error.write().await = enabled;
    }

    /// Bytes to write as conversion output.
    pub async fn set_output_bytes(&self, bytes: Vec<u8>) {
        *self.output_bytes.write().await = Some(bytes);
    }

    /// Set simulated conversion duration.
    pub async fn set_conversion_duration(&self, duration: Duration) {
        *self.conversion_duration_ms.write().await = duration.as_millis() as u64;
    }

    async fn write_output(&self, job: &ConversionJob) -> Result<u64, ConverterError> {
        let bytes = match self.output_bytes.read().await.clone() {
            Some(bytes) => bytes,
            None => {
                let input = tokio::fs::read(&job.input_path).await?;
                let mut bytes = b"converted:".to_vec();
                bytes.extend_from_slice(&input);
                bytes
            }
        };
        tokio::fs::write(&job.output_path, &bytes).await?;
        Ok(bytes.len() as u64)
    }

    async fn record(&self, job: ConversionJob, success: bool) {
        self.conversions
            .write()
            .await
            .push(RecordedConversion { job, success });
    }
}

#[async_trait]
impl AudioConverter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn is_available(&self) -> bool {
        *self.available.read().await
    }

    async fn convert(&self, job: ConversionJob) -> Result<ConversionOutput, ConverterError> {
        if let Some(err) = self.next_error.write().await.take() {
            if *self.partial_output_on_error.read().await {
                let _ = self.write_output(&job).await;
            }
            self.record(job, false).await;
            return Err(err);
        }

        if let Err(err) = job.ensure_direction_matches() {
            self.record(job, false).await;
            return Err(err);
        }

        let duration_ms = *self.conversion_duration_ms.read().await;
        if duration_ms > 0 {
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;
        }

        let output_size_bytes = match self.write_output(&job).await {
            Ok(size) => size,
            Err(err) => {
                self.record(job, false).await;
                return Err(err);
            }
        };

        self.record(job.clone(), true).await;

        Ok(ConversionOutput {
            job_id: job.job_id,
            output_path: job.output_path,
            output_size_bytes,
            duration_ms,
            output_format: job.direction.target_format(),
        })
    }
}
