//! Converter module wrapping the external audio codec tool.
//!
//! This module provides the `AudioConverter` trait and the FFmpeg-backed
//! implementation used to convert between WAV and MP3.
//!
//! # Example
//!
//! ```ignore
//! use wavswap_core::converter::{AudioConverter, ConversionDirection, ConversionJob, FfmpegConverter};
//!
//! let converter = FfmpegConverter::with_defaults();
//!
//! if converter.is_available().await {
//!     let output = converter
//!         .convert(ConversionJob {
//!             job_id: "job-1".to_string(),
//!             input_path: PathBuf::from("/uploads/song.wav"),
//!             output_path: PathBuf::from("/downloads/song.mp3"),
//!             direction: ConversionDirection::WavToMp3,
//!         })
//!         .await?;
//!     println!("Converted in {} ms", output.duration_ms);
//! }
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::ConverterConfig;
pub use error::ConverterError;
pub use ffmpeg::FfmpegConverter;
pub use traits::AudioConverter;
pub use types::{
    AudioFormat, ConversionDirection, ConversionJob, ConversionOutput, UnknownDirection,
};
