//! Capacity guard
//!
//! Pre-flight check that the incoming object fits on the scratch filesystem
//! before any payload is transferred. Purely advisory: it queries sizes and
//! reserves nothing.

use std::path::{Path, PathBuf};
use sysinfo::Disks;

use cloudvideo_core::PipelineError;
use cloudvideo_storage::Storage;

pub struct CapacityChecker {
    scratch_root: PathBuf,
}

impl CapacityChecker {
    pub fn new(scratch_root: impl Into<PathBuf>) -> Self {
        Self {
            scratch_root: scratch_root.into(),
        }
    }

    /// Check that the remote object fits in the scratch filesystem.
    ///
    /// The remote size comes from a metadata-only lookup; any failure to
    /// determine it (object missing or inaccessible) is `NotFound`. A failed
    /// local disk query counts as zero available bytes.
    pub async fn check_available_space(
        &self,
        storage: &dyn Storage,
        storage_key: &str,
    ) -> Result<(), PipelineError> {
        let object_bytes = match storage.content_length(storage_key).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    key = %storage_key,
                    "Object size could not be determined"
                );
                return Err(PipelineError::NotFound(storage_key.to_string()));
            }
        };

        let available_bytes = match self.available_bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %self.scratch_root.display(),
                    "Failed to query scratch disk space"
                );
                0
            }
        };

        tracing::debug!(
            key = %storage_key,
            object_bytes = object_bytes,
            available_bytes = available_bytes,
            "Capacity check"
        );

        ensure_fits(object_bytes, available_bytes)
    }

    /// Free bytes on the filesystem holding the scratch root.
    pub async fn available_bytes(&self) -> anyhow::Result<u64> {
        let path = self.scratch_root.clone();
        // sysinfo enumeration is blocking
        tokio::task::spawn_blocking(move || query_available_bytes(&path))
            .await
            .map_err(|e| anyhow::anyhow!("spawn_blocking for disk space query: {}", e))?
    }
}

fn query_available_bytes(path: &Path) -> anyhow::Result<u64> {
    let canonical = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf());

    let disks = Disks::new_with_refreshed_list();

    // Longest matching mount point wins, so /tmp on its own mount beats /.
    disks
        .iter()
        .filter(|disk| canonical.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().as_os_str().len())
        .map(|disk| disk.available_space())
        .ok_or_else(|| {
            anyhow::anyhow!("Could not determine disk space for path: {}", path.display())
        })
}

/// Advisory fit check: fails with `OutOfSpace` when the object exceeds the
/// available local bytes.
pub fn ensure_fits(object_bytes: u64, available_bytes: u64) -> Result<(), PipelineError> {
    if object_bytes > available_bytes {
        tracing::warn!(
            object_bytes = object_bytes,
            available_bytes = available_bytes,
            "Out of space"
        );
        return Err(PipelineError::OutOfSpace {
            available: available_bytes,
            required: object_bytes,
        });
    }
    Ok(())
}
