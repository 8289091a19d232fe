//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

use super::types::ConversionDirection;

/// Errors that can occur during conversion.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// The input file's extension does not match the requested direction.
    #[error("File type ({extension}) doesn't match conversion type ({direction})")]
    DirectionMismatch {
        extension: String,
        direction: ConversionDirection,
    },

    /// Output directory does not exist and could not be created.
    #[error("Failed to create output directory: {path}")]
    OutputDirectoryFailed { path: PathBuf },

    /// Conversion process failed.
    #[error("Conversion failed: {reason}")]
    ConversionFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// Conversion timed out.
    #[error("Conversion timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error during conversion.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConverterError {
    /// Creates a new conversion failed error with stderr output.
    pub fn conversion_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ConversionFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Label used for the result dimension of conversion metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FfmpegNotFound { .. } => "ffmpeg_not_found",
            Self::InputNotFound { .. } => "input_not_found",
            Self::DirectionMismatch { .. } => "direction_mismatch",
            Self::OutputDirectoryFailed { .. } => "output_directory_failed",
            Self::ConversionFailed { .. } => "failed",
            Self::Timeout { .. } => "timeout",
            Self::Io(_) => "io",
        }
    }
}
