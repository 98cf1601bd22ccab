//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait.
/// This lets the pipeline work against any backend without coupling to
/// implementation details, and lets tests run against the local backend.
///
/// **Key format:** `uploads/{filename}` for sources, `rendered/{name}` for
/// results. See the crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Size in bytes of an object, without transferring its payload.
    ///
    /// Returns `StorageError::NotFound` when the object does not exist.
    async fn content_length(&self, storage_key: &str) -> StorageResult<u64>;

    /// Check if an object exists.
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Download an object to a local file, returning the byte count written.
    ///
    /// On error the partially written local file is not cleaned up; callers
    /// own the scratch directory lifecycle.
    async fn download_to_path(&self, storage_key: &str, local_path: &Path) -> StorageResult<u64>;

    /// Upload a complete local file to the given key.
    async fn upload_from_path(&self, local_path: &Path, storage_key: &str) -> StorageResult<()>;
}
