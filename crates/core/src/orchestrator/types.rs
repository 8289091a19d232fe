//! Orchestrator types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::converter::{AudioFormat, ConversionDirection};

/// The `file` part of an upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied name, untrusted. Empty when the client sent no name.
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// One conversion request as received over HTTP.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    /// `None` when the form had no `file` part.
    pub file: Option<UploadedFile>,
    /// Raw `conversion_type` field; `None` means `wav2mp3`.
    pub conversion_type: Option<String>,
}

impl UploadRequest {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>, direction: ConversionDirection) -> Self {
        Self {
            file: Some(UploadedFile {
                filename: filename.into(),
                bytes,
            }),
            conversion_type: Some(direction.as_str().to_string()),
        }
    }
}

/// Lifecycle stage of a request, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStage {
    Received,
    Validated,
    Stored,
    Converting,
    Succeeded,
    Failed,
}

impl fmt::Display for ConversionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConversionStage::Received => "received",
            ConversionStage::Validated => "validated",
            ConversionStage::Stored => "stored",
            ConversionStage::Converting => "converting",
            ConversionStage::Succeeded => "succeeded",
            ConversionStage::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A finished conversion. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutcome {
    /// Token shared by the incoming and outgoing assets.
    pub token: String,
    pub direction: ConversionDirection,
    pub output_format: AudioFormat,
    /// Sanitized original name with the target extension.
    pub converted_filename: String,
    /// `{token}_{converted_filename}` in the outgoing area.
    pub stored_name: String,
    /// Path the delivery endpoint serves the result under.
    pub download_url: String,
    pub output_size_bytes: u64,
    pub duration_ms: u64,
}

/// URL path of a stored outgoing asset.
pub fn download_url(stored_name: &str) -> String {
    format!("/download/{}", stored_name)
}
