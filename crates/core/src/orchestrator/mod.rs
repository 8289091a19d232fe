//! Conversion orchestrator.
//!
//! Drives a single upload through
//! `Received → Validated → Stored → Converting → Succeeded | Failed`:
//!
//! 1. Refuse early when the conversion engine is unavailable.
//! 2. Reject missing, unnamed, or disallowed uploads.
//! 3. Store the bytes in the incoming area as `{token}_{sanitized name}`.
//! 4. Check the stored name's extension against the requested direction.
//! 5. Convert into the outgoing area under the same token.
//!
//! Any failure after step 3 removes the incoming asset (best-effort).

mod error;
mod service;
mod types;

pub use error::{ConversionServiceError, FFMPEG_UNAVAILABLE_MESSAGE};
pub use service::ConversionService;
pub use types::{download_url, ConversionOutcome, ConversionStage, UploadRequest, UploadedFile};

