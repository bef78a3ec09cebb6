use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::fs;

use super::asset::AssetRef;
use super::error::StorageError;
use super::hash::ContentHash;
use super::traits::AssetStore;

/// Filesystem-backed asset store rooted at the served `assets` directory.
///
/// Layout: `{base_path}/uploads/{YYYYMMDD}/{hash}.{ext}` for staging and
/// `{base_path}/imgs/{resource_id}/{filename}` for canonical files.
pub struct FilesystemAssetStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemAssetStore {
    /// Create a new filesystem asset store.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_of(&self, asset: &AssetRef) -> PathBuf {
        self.base_path.join(asset.relative_path())
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }

    /// Move a fully written temp file into place.
    async fn publish(&self, temp_path: &Path, dest: &Path) -> Result<(), StorageError> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }
        if let Err(e) = fs::rename(temp_path, dest).await {
            let _ = fs::remove_file(temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl AssetStore for FilesystemAssetStore {
    async fn stage(
        &self,
        data: &[u8],
        extension: Option<&str>,
        date: NaiveDate,
    ) -> Result<AssetRef, StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let hash = ContentHash::compute(data);
        let asset = AssetRef::staged(date.format("%Y%m%d").to_string(), hash.filename(extension));
        let dest = self.path_of(&asset);

        if fs::try_exists(&dest).await? {
            return Ok(asset);
        }

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        self.publish(&temp_path, &dest).await?;

        Ok(asset)
    }

    async fn exists(&self, asset: &AssetRef) -> Result<bool, StorageError> {
        Ok(fs::try_exists(self.path_of(asset)).await?)
    }

    async fn copy(&self, from: &AssetRef, to: &AssetRef) -> Result<(), StorageError> {
        let source = self.path_of(from);
        if !fs::try_exists(&source).await? {
            return Err(StorageError::NotFound(from.to_string()));
        }

        let temp_path = self.temp_path();
        if let Err(e) = fs::copy(&source, &temp_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        self.publish(&temp_path, &self.path_of(to)).await
    }
}
