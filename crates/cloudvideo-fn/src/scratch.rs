//! Scratch directory management
//!
//! The scratch root is process-wide state shared across invocations on a
//! reused execution environment, so it is cleared at the start of every run
//! and emptied again (best-effort) on success.

use std::path::Path;
use tokio::fs;

/// Remove a single file. Idempotent: a non-existent path is a no-op success.
pub async fn remove_file(path: &Path) -> bool {
    if !fs::try_exists(path).await.unwrap_or(false) {
        return true;
    }

    tracing::debug!(path = %path.display(), "Removing scratch file");

    match fs::remove_file(path).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, path = %path.display(), "Failed to remove scratch file");
            false
        }
    }
}

/// Remove every entry under `root`: files, symbolic links, and subdirectories
/// recursively. A failure on one entry is logged and does not stop the
/// remaining removals; the return value reflects whether all entries went.
pub async fn clear_directory(root: &Path) -> bool {
    let mut entries = match fs::read_dir(root).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!(error = %e, path = %root.display(), "Failed to read scratch directory");
            return false;
        }
    };

    let mut all_removed = true;

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, path = %root.display(), "Failed to list scratch entry");
                all_removed = false;
                break;
            }
        };

        let path = entry.path();
        // file_type does not follow symlinks, so a link to a directory is
        // removed as a file rather than traversed.
        let is_dir = entry
            .file_type()
            .await
            .map(|ft| ft.is_dir())
            .unwrap_or(false);

        let result = if is_dir {
            fs::remove_dir_all(&path).await
        } else {
            fs::remove_file(&path).await
        };

        if let Err(e) = result {
            tracing::error!(error = %e, path = %path.display(), "Failed to remove scratch entry");
            all_removed = false;
        }
    }

    all_removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_remove_file_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clip.mov");

        // Non-existent path is a no-op success, repeatedly.
        assert!(remove_file(&path).await);
        assert!(remove_file(&path).await);

        fs::write(&path, b"data").await.unwrap();
        assert!(remove_file(&path).await);
        assert!(!path.exists());
        assert!(remove_file(&path).await);
    }

    #[tokio::test]
    async fn test_clear_directory_empty_twice() {
        let dir = tempdir().unwrap();
        assert!(clear_directory(dir.path()).await);
        assert!(clear_directory(dir.path()).await);
    }

    #[tokio::test]
    async fn test_clear_directory_removes_everything() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.mov"), b"a").await.unwrap();
        fs::create_dir_all(dir.path().join("nested/deeper"))
            .await
            .unwrap();
        fs::write(dir.path().join("nested/deeper/b.mp4"), b"b")
            .await
            .unwrap();
        #[cfg(unix)]
        std::os::unix::fs::symlink(dir.path().join("a.mov"), dir.path().join("link")).unwrap();

        assert!(clear_directory(dir.path()).await);

        let mut entries = fs::read_dir(dir.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_directory_missing_root() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone");
        assert!(!clear_directory(&missing).await);
    }
}
