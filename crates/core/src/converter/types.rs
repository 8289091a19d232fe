//! Data types for the converter module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::error::ConverterError;

/// Audio container formats the service accepts and produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// RIFF/WAVE with PCM samples.
    Wav,
    /// MPEG-1 Layer III.
    Mp3,
}

impl AudioFormat {
    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
        }
    }

    /// FFmpeg audio encoder used to produce this format.
    pub fn ffmpeg_codec(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "pcm_s16le",
            AudioFormat::Mp3 => "libmp3lame",
        }
    }

    /// FFmpeg muxer name.
    pub fn ffmpeg_muxer(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
        }
    }

    /// Whether this format is lossless (no bitrate setting applies).
    pub fn is_lossless(&self) -> bool {
        matches!(self, AudioFormat::Wav)
    }

    /// Looks up a format by a case-insensitive extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "wav" => Some(AudioFormat::Wav),
            "mp3" => Some(AudioFormat::Mp3),
            _ => None,
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Requested conversion direction.
///
/// Wire names match the form field values sent by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConversionDirection {
    #[default]
    #[serde(rename = "wav2mp3")]
    WavToMp3,
    #[serde(rename = "mp32wav")]
    Mp3ToWav,
}

impl ConversionDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionDirection::WavToMp3 => "wav2mp3",
            ConversionDirection::Mp3ToWav => "mp32wav",
        }
    }

    /// Format the uploaded file must have.
    pub fn source_format(&self) -> AudioFormat {
        match self {
            ConversionDirection::WavToMp3 => AudioFormat::Wav,
            ConversionDirection::Mp3ToWav => AudioFormat::Mp3,
        }
    }

    /// Format produced by the conversion.
    pub fn target_format(&self) -> AudioFormat {
        match self {
            ConversionDirection::WavToMp3 => AudioFormat::Mp3,
            ConversionDirection::Mp3ToWav => AudioFormat::Wav,
        }
    }
}

impl fmt::Display for ConversionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown direction name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDirection(pub String);

impl fmt::Display for UnknownDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid conversion type: {}", self.0)
    }
}

impl std::error::Error for UnknownDirection {}

impl FromStr for ConversionDirection {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wav2mp3" => Ok(ConversionDirection::WavToMp3),
            "mp32wav" => Ok(ConversionDirection::Mp3ToWav),
            other => Err(UnknownDirection(other.to_string())),
        }
    }
}

/// A single conversion to run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionJob {
    /// Identifier used in logs (the request token).
    pub job_id: String,
    /// File to read.
    pub input_path: PathBuf,
    /// File to write. Overwritten if present.
    pub output_path: PathBuf,
    /// Direction; must agree with the input file's extension.
    pub direction: ConversionDirection,
}

impl ConversionJob {
    /// Lowercased extension of the input file, if any.
    pub fn input_extension(&self) -> Option<String> {
        self.input_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    /// Checks that the input file's extension is the direction's source format.
    pub fn ensure_direction_matches(&self) -> Result<(), ConverterError> {
        let extension = self.input_extension().unwrap_or_default();
        if AudioFormat::from_extension(&extension) == Some(self.direction.source_format()) {
            Ok(())
        } else {
            Err(ConverterError::DirectionMismatch {
                extension,
                direction: self.direction,
            })
        }
    }
}

/// Output of a successful conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    pub job_id: String,
    pub output_path: PathBuf,
    pub output_size_bytes: u64,
    /// Wall-clock time spent in the external tool.
    pub duration_ms: u64,
    pub output_format: AudioFormat,
}
