use async_trait::async_trait;
use chrono::NaiveDate;

use super::asset::AssetRef;
use super::error::StorageError;

/// File storage split into a staging area and a canonical per-resource area.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store an upload in the staging area for `date`, named by content hash.
    ///
    /// Uploading identical bytes on the same day yields the same reference.
    async fn stage(
        &self,
        data: &[u8],
        extension: Option<&str>,
        date: NaiveDate,
    ) -> Result<AssetRef, StorageError>;

    /// Check whether the referenced file exists.
    async fn exists(&self, asset: &AssetRef) -> Result<bool, StorageError>;

    /// Copy `from` to `to`, creating parent directories. The source is kept.
    ///
    /// Returns `StorageError::NotFound` if the source does not exist.
    async fn copy(&self, from: &AssetRef, to: &AssetRef) -> Result<(), StorageError>;
}
