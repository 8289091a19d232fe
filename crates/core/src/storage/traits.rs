//! Trait definitions for the storage module.

use async_trait::async_trait;
use std::path::PathBuf;

use super::error::StorageError;
use super::types::{AssetEntry, StorageArea, StoredAsset};

/// Backing store for incoming and outgoing assets.
///
/// Implementations keep no index: listing an area is the only metadata
/// query, and names are flat (no directories inside an area).
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Returns the name of this store implementation.
    fn name(&self) -> &str;

    /// Creates the storage areas if missing.
    async fn init(&self) -> Result<(), StorageError>;

    /// Writes `bytes` as a new asset `{token}_{base_name}`. Never overwrites.
    async fn put(
        &self,
        area: StorageArea,
        token: &str,
        base_name: &str,
        bytes: &[u8],
    ) -> Result<StoredAsset, StorageError>;

    /// Describes where `{token}_{base_name}` lives without writing it, so an
    /// external tool can produce the file directly.
    fn reserve(
        &self,
        area: StorageArea,
        token: &str,
        base_name: &str,
    ) -> Result<StoredAsset, StorageError>;

    /// Path of an existing asset, `None` when absent.
    ///
    /// Names that could escape the area are rejected with
    /// [`StorageError::InvalidName`].
    async fn locate(&self, area: StorageArea, name: &str) -> Result<Option<PathBuf>, StorageError>;

    /// Deletes one asset.
    async fn remove(&self, area: StorageArea, name: &str) -> Result<(), StorageError>;

    /// Deletes an entry previously returned by [`AssetStore::list`].
    ///
    /// Listed names may not pass name validation (a stray `a..b.mp3` dropped
    /// into an area by hand), so stores that can address entries by path
    /// should override this.
    async fn remove_entry(&self, area: StorageArea, entry: &AssetEntry) -> Result<(), StorageError> {
        self.remove(area, &entry.name).await
    }

    /// Lists the files in an area. Entries whose metadata cannot be read are skipped.
    async fn list(&self, area: StorageArea) -> Result<Vec<AssetEntry>, StorageError>;
}
