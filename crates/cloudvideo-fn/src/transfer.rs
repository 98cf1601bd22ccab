//! Object transfer
//!
//! The two directions of the same capability: fetch a remote object to a
//! local path, store a local path as a remote object. Both log the underlying
//! cause and report plain success/failure; the orchestrator turns a `false`
//! into the fatal pipeline error for its stage.

use std::path::Path;
use std::sync::Arc;

use cloudvideo_storage::Storage;

#[derive(Clone)]
pub struct ObjectTransfer {
    storage: Arc<dyn Storage>,
}

impl ObjectTransfer {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Download `storage_key` to `local_path`. On failure the partial local
    /// file, if any, is left for the scratch clear to collect.
    pub async fn fetch(&self, storage_key: &str, local_path: &Path) -> bool {
        match self.storage.download_to_path(storage_key, local_path).await {
            Ok(size) => {
                tracing::debug!(
                    key = %storage_key,
                    path = %local_path.display(),
                    size_bytes = size,
                    "Fetched source object"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    key = %storage_key,
                    path = %local_path.display(),
                    "Fetch failed"
                );
                false
            }
        }
    }

    /// Upload `local_path` as `storage_key`. Assumes the local file exists
    /// and is complete.
    pub async fn store(&self, local_path: &Path, storage_key: &str) -> bool {
        match self.storage.upload_from_path(local_path, storage_key).await {
            Ok(()) => {
                tracing::debug!(
                    key = %storage_key,
                    path = %local_path.display(),
                    "Stored rendered object"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    key = %storage_key,
                    path = %local_path.display(),
                    "Store failed"
                );
                false
            }
        }
    }
}
