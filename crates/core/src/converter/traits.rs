//! Trait definitions for the converter module.

use async_trait::async_trait;

use super::error::ConverterError;
use super::types::{ConversionJob, ConversionOutput};

/// Wrapper around an external audio conversion engine.
#[async_trait]
pub trait AudioConverter: Send + Sync {
    /// Returns the name of this converter implementation.
    fn name(&self) -> &str;

    /// Lightweight probe of the underlying tool. Never fails: any problem
    /// locating or running the tool yields `false`.
    async fn is_available(&self) -> bool;

    /// Converts `job.input_path` into `job.output_path`.
    ///
    /// Fails with [`ConverterError::DirectionMismatch`] when the input's
    /// extension is not the direction's source format.
    async fn convert(&self, job: ConversionJob) -> Result<ConversionOutput, ConverterError>;
}
