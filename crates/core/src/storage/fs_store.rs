//! Local filesystem asset store.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, warn};

use super::error::StorageError;
use super::traits::AssetStore;
use super::types::{asset_name, AssetEntry, StorageArea, StoredAsset};
use crate::config::StorageConfig;
use crate::validator::is_flat_name;

/// Stores each area as one flat directory.
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    incoming_dir: PathBuf,
    outgoing_dir: PathBuf,
}

impl FsAssetStore {
    /// Creates a store over the configured upload and download directories.
    pub fn new(config: &StorageConfig) -> Self {
        Self::with_dirs(config.upload_dir.clone(), config.download_dir.clone())
    }

    pub fn with_dirs(incoming_dir: PathBuf, outgoing_dir: PathBuf) -> Self {
        Self {
            incoming_dir,
            outgoing_dir,
        }
    }

    /// Directory backing `area`.
    pub fn dir(&self, area: StorageArea) -> &Path {
        match area {
            StorageArea::Incoming => &self.incoming_dir,
            StorageArea::Outgoing => &self.outgoing_dir,
        }
    }

    fn checked_path(&self, area: StorageArea, name: &str) -> Result<PathBuf, StorageError> {
        if !is_flat_name(name) {
            return Err(StorageError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(self.dir(area).join(name))
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    fn name(&self) -> &str {
        "fs"
    }

    async fn init(&self) -> Result<(), StorageError> {
        for area in StorageArea::ALL {
            let dir = self.dir(area);
            fs::create_dir_all(dir)
                .await
                .map_err(|e| StorageError::DirectoryCreationFailed {
                    path: dir.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    async fn put(
        &self,
        area: StorageArea,
        token: &str,
        base_name: &str,
        bytes: &[u8],
    ) -> Result<StoredAsset, StorageError> {
        let asset = self.reserve(area, token, base_name)?;

        // create_new: a token collision must never clobber another request's file
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&asset.path)
            .await
            .map_err(|e| StorageError::io(&asset.path, e))?;

        let mut writer = BufWriter::new(file);
        writer
            .write_all(bytes)
            .await
            .map_err(|e| StorageError::io(&asset.path, e))?;
        writer
            .flush()
            .await
            .map_err(|e| StorageError::io(&asset.path, e))?;

        debug!(area = %area, path = ?asset.path, bytes = bytes.len(), "Stored asset");
        Ok(asset)
    }

    fn reserve(
        &self,
        area: StorageArea,
        token: &str,
        base_name: &str,
    ) -> Result<StoredAsset, StorageError> {
        let path = self.checked_path(area, &asset_name(token, base_name))?;
        Ok(StoredAsset {
            area,
            token: token.to_string(),
            base_name: base_name.to_string(),
            path,
        })
    }

    async fn locate(&self, area: StorageArea, name: &str) -> Result<Option<PathBuf>, StorageError> {
        let path = self.checked_path(area, name)?;
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(Some(path)),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    async fn remove(&self, area: StorageArea, name: &str) -> Result<(), StorageError> {
        let path = self.checked_path(area, name)?;
        fs::remove_file(&path)
            .await
            .map_err(|e| StorageError::io(path, e))
    }

    async fn remove_entry(&self, area: StorageArea, entry: &AssetEntry) -> Result<(), StorageError> {
        // only files sitting directly in the area directory
        if entry.path.parent() != Some(self.dir(area)) {
            return Err(StorageError::InvalidName {
                name: entry.name.clone(),
            });
        }
        fs::remove_file(&entry.path)
            .await
            .map_err(|e| StorageError::io(&entry.path, e))
    }

    async fn list(&self, area: StorageArea) -> Result<Vec<AssetEntry>, StorageError> {
        let dir = self.dir(area);
        let mut read_dir = fs::read_dir(dir)
            .await
            .map_err(|e| StorageError::io(dir, e))?;

        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| StorageError::io(dir, e))?
        {
            let path = entry.path();
            let meta = match entry.metadata().await {
                Ok(meta) => meta,
                Err(e) => {
                    warn!(area = %area, path = ?path, error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !meta.is_file() {
                continue;
            }
            let modified = match meta.modified() {
                Ok(modified) => modified,
                Err(e) => {
                    warn!(area = %area, path = ?path, error = %e, "Skipping entry without mtime");
                    continue;
                }
            };

            entries.push(AssetEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                path,
                modified,
                size_bytes: meta.len(),
            });
        }

        Ok(entries)
    }
}
