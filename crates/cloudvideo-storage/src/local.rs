use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem storage implementation
///
/// Used for local development and the test suite; objects are plain files
/// under a base directory, keyed by their storage key.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for object storage (e.g., "/var/lib/cloudvideo/objects")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Rejects keys with path traversal sequences that could escape the base
    /// storage directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.contains("..") || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(storage_key))
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn content_length(&self, storage_key: &str) -> StorageResult<u64> {
        let path = self.key_to_path(storage_key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }

        let meta = fs::metadata(&path)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        Ok(meta.len())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn download_to_path(&self, storage_key: &str, local_path: &Path) -> StorageResult<u64> {
        let path = self.key_to_path(storage_key)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }

        let size = fs::copy(&path, local_path).await.map_err(|e| {
            StorageError::DownloadFailed(format!(
                "Failed to copy {} to {}: {}",
                path.display(),
                local_path.display(),
                e
            ))
        })?;

        tracing::info!(
            key = %storage_key,
            path = %local_path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage download successful"
        );

        Ok(size)
    }

    async fn upload_from_path(&self, local_path: &Path, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;
        let start = std::time::Instant::now();

        self.ensure_parent_dir(&path).await?;

        let size = fs::copy(local_path, &path).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to copy {} to {}: {}",
                local_path.display(),
                path.display(),
                e
            ))
        })?;

        tracing::info!(
            key = %storage_key,
            path = %local_path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_upload_download_roundtrip() {
        let objects = tempdir().unwrap();
        let scratch = tempdir().unwrap();
        let storage = LocalStorage::new(objects.path()).await.unwrap();

        let source = scratch.path().join("clip.mov");
        fs::write(&source, b"video bytes").await.unwrap();

        storage
            .upload_from_path(&source, "uploads/clip.mov")
            .await
            .unwrap();

        assert!(storage.exists("uploads/clip.mov").await.unwrap());
        assert_eq!(
            storage.content_length("uploads/clip.mov").await.unwrap(),
            11
        );

        let dest = scratch.path().join("fetched.mov");
        let size = storage
            .download_to_path("uploads/clip.mov", &dest)
            .await
            .unwrap();
        assert_eq!(size, 11);
        assert_eq!(fs::read(&dest).await.unwrap(), b"video bytes");
    }

    #[tokio::test]
    async fn test_content_length_missing_object() {
        let objects = tempdir().unwrap();
        let storage = LocalStorage::new(objects.path()).await.unwrap();

        let result = storage.content_length("uploads/missing.mov").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_download_missing_object() {
        let objects = tempdir().unwrap();
        let scratch = tempdir().unwrap();
        let storage = LocalStorage::new(objects.path()).await.unwrap();

        let dest = scratch.path().join("out.mov");
        let result = storage.download_to_path("uploads/missing.mov", &dest).await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let objects = tempdir().unwrap();
        let storage = LocalStorage::new(objects.path()).await.unwrap();

        let result = storage.content_length("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.exists("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
