//! Error taxonomy for conversion requests.

use thiserror::Error;

use crate::converter::ConverterError;
use crate::storage::StorageError;

pub const FFMPEG_UNAVAILABLE_MESSAGE: &str =
    "FFmpeg is not installed or not in PATH. Please contact the administrator.";

/// Why a conversion request failed.
#[derive(Debug, Error)]
pub enum ConversionServiceError {
    /// The conversion engine cannot be run.
    #[error("{}", FFMPEG_UNAVAILABLE_MESSAGE)]
    ServiceUnavailable,

    /// Missing, malformed, or disallowed upload.
    #[error("{0}")]
    BadRequest(String),

    /// The requested direction does not match the uploaded file's extension.
    #[error("{0}")]
    Validation(String),

    /// The conversion engine failed.
    #[error("{0}")]
    Conversion(ConverterError),

    /// Filesystem or other unexpected fault.
    #[error("{0}")]
    Internal(#[from] StorageError),
}

impl ConversionServiceError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable => "service_unavailable",
            Self::BadRequest(_) => "bad_request",
            Self::Validation(_) => "validation",
            Self::Conversion(_) => "conversion",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<ConverterError> for ConversionServiceError {
    fn from(err: ConverterError) -> Self {
        match err {
            ConverterError::DirectionMismatch { .. } => Self::Validation(err.to_string()),
            ConverterError::FfmpegNotFound { .. } => Self::ServiceUnavailable,
            other => Self::Conversion(other),
        }
    }
}
