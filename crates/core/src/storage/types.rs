//! Data types for the storage module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;
use uuid::Uuid;

/// One of the two disjoint storage areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageArea {
    /// Uploaded originals awaiting or past conversion.
    Incoming,
    /// Conversion results available for download.
    Outgoing,
}

impl StorageArea {
    pub const ALL: [StorageArea; 2] = [StorageArea::Incoming, StorageArea::Outgoing];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageArea::Incoming => "incoming",
            StorageArea::Outgoing => "outgoing",
        }
    }
}

impl fmt::Display for StorageArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generates a fresh token for prefixing stored names.
pub fn new_token() -> String {
    Uuid::new_v4().to_string()
}

/// Stored name for `name` under `token`: `{token}_{name}`.
pub fn asset_name(token: &str, name: &str) -> String {
    format!("{}_{}", token, name)
}

/// A file placed in a storage area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAsset {
    pub area: StorageArea,
    /// Token shared by all assets of one request.
    pub token: String,
    /// Sanitized name without the token.
    pub base_name: String,
    /// Full on-disk path.
    pub path: PathBuf,
}

impl StoredAsset {
    /// The `{token}_{base_name}` file name.
    pub fn name(&self) -> String {
        asset_name(&self.token, &self.base_name)
    }
}

/// A directory entry as seen by a listing.
#[derive(Debug, Clone)]
pub struct AssetEntry {
    pub name: String,
    pub path: PathBuf,
    pub modified: SystemTime,
    pub size_bytes: u64,
}
