//! Asset storage for uploads and conversion results.
//!
//! The service treats the filesystem as its only database: each storage
//! area is a flat directory and listing it is the only metadata query. The
//! [`AssetStore`] trait keeps that choice out of the orchestrator so an
//! indexed store can replace it later.

mod error;
mod fs_store;
mod traits;
mod types;

pub use error::StorageError;
pub use fs_store::FsAssetStore;
pub use traits::AssetStore;
pub use types::{asset_name, new_token, AssetEntry, StorageArea, StoredAsset};
