//! Pipeline orchestrator
//!
//! One invocation moves through validate → capacity check → fetch → render →
//! store → cleanup. The first fatal failure aborts the run and surfaces a
//! single error to the trigger; there is no partial success. Cleanup never
//! escalates: a failed removal is logged and collected by the scratch clear
//! at the start of the next invocation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cloudvideo_core::{Config, PipelineError, TaskCatalog};
use cloudvideo_storage::{keys, Storage};

use crate::capacity::CapacityChecker;
use crate::render::FfmpegRenderer;
use crate::scratch;
use crate::transfer::ObjectTransfer;

/// Incoming request: a URL-encoded source filename under the uploads
/// namespace, plus the tasks to run.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderRequest {
    pub filename: String,
    #[serde(default)]
    pub tasks: Vec<String>,
}

/// Success marker returned to the trigger.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct RenderResponse {
    pub data: String,
}

impl RenderResponse {
    fn success() -> Self {
        RenderResponse {
            data: "success".to_string(),
        }
    }
}

pub struct Pipeline {
    scratch_root: PathBuf,
    catalog: TaskCatalog,
    storage: Arc<dyn Storage>,
    capacity: CapacityChecker,
    transfer: ObjectTransfer,
    renderer: FfmpegRenderer,
}

impl Pipeline {
    pub fn new(config: &Config, storage: Arc<dyn Storage>) -> Self {
        let catalog = TaskCatalog::new();
        let scratch_root = config.scratch_root.clone();

        Pipeline {
            capacity: CapacityChecker::new(&scratch_root),
            transfer: ObjectTransfer::new(storage.clone()),
            renderer: FfmpegRenderer::new(
                config.ffmpeg_path.clone(),
                &scratch_root,
                catalog.clone(),
            ),
            storage,
            scratch_root,
            catalog,
        }
    }

    /// Version of the configured ffmpeg binary, for the startup log.
    pub async fn ffmpeg_version(&self) -> String {
        self.renderer.ffmpeg_version().await
    }

    /// Validate the request before any network or process call: URL-decode
    /// the filename, reduce it to a bare basename, and require a non-empty
    /// task list of known names.
    fn validate(&self, request: &RenderRequest) -> Result<String, PipelineError> {
        if request.filename.is_empty() {
            return Err(PipelineError::InvalidRequest("filename is empty".into()));
        }

        let decoded = urlencoding::decode(&request.filename)
            .map_err(|e| PipelineError::InvalidRequest(format!("filename is not valid: {}", e)))?;

        let filename = Path::new(decoded.as_ref())
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                PipelineError::InvalidRequest(format!("filename is not valid: {}", decoded))
            })?;

        if request.tasks.is_empty() {
            return Err(PipelineError::InvalidRequest("no tasks requested".into()));
        }

        for task in &request.tasks {
            if !self.catalog.contains(task) {
                return Err(PipelineError::InvalidRequest(format!(
                    "unknown task: {} (known: {})",
                    task,
                    self.catalog.task_names().join(", ")
                )));
            }
        }

        Ok(filename)
    }

    /// Run one invocation end to end.
    pub async fn run(&self, request: RenderRequest) -> Result<RenderResponse, PipelineError> {
        tracing::debug!(
            filename = %request.filename,
            tasks = ?request.tasks,
            "Pipeline invoked"
        );

        let filename = self.validate(&request)?;

        // Scratch is shared across invocations on a reused execution
        // environment; leftovers from a failed run are collected here.
        if !scratch::clear_directory(&self.scratch_root).await {
            tracing::warn!(
                path = %self.scratch_root.display(),
                "Scratch directory not fully cleared"
            );
        }

        let source_key = keys::source_key(&filename);
        self.capacity
            .check_available_space(self.storage.as_ref(), &source_key)
            .await?;

        let local_source = self.scratch_root.join(&filename);
        if !self.transfer.fetch(&source_key, &local_source).await {
            return Err(PipelineError::DownloadFailed(source_key));
        }

        let local_rendered = self.scratch_root.join(keys::rendered_name(&filename));
        let rendered_key = keys::rendered_key(&filename);
        let task_count = request.tasks.len();

        for (index, task) in request.tasks.iter().enumerate() {
            let clean = self
                .renderer
                .render(&local_source, &local_rendered, task)
                .await
                .map_err(|e| PipelineError::RenderFailed(e.to_string()))?;

            if !clean {
                return Err(PipelineError::RenderFailed(format!(
                    "task {} reported diagnostics",
                    task
                )));
            }

            if let Ok(meta) = tokio::fs::metadata(&local_rendered).await {
                tracing::debug!(
                    task = %task,
                    path = %local_rendered.display(),
                    size_bytes = meta.len(),
                    "Rendered file written"
                );
            }

            if !self.transfer.store(&local_rendered, &rendered_key).await {
                return Err(PipelineError::UploadFailed(rendered_key));
            }

            // Keep at most one rendered file in scratch between tasks.
            if index + 1 < task_count && !scratch::remove_file(&local_rendered).await {
                tracing::warn!(
                    path = %local_rendered.display(),
                    "Failed to remove rendered file between tasks"
                );
            }
        }

        // Best-effort cleanup; never fatal.
        if !scratch::remove_file(&local_source).await {
            tracing::info!(
                path = %local_source.display(),
                "Failed to remove source file"
            );
        }
        if !scratch::remove_file(&local_rendered).await {
            tracing::info!(
                path = %local_rendered.display(),
                "Failed to remove rendered file"
            );
        }

        Ok(RenderResponse::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudvideo_core::{Environment, StorageBackend};
    use cloudvideo_storage::LocalStorage;
    use tempfile::tempdir;

    async fn pipeline(objects: &Path, scratch: &Path) -> Pipeline {
        let storage = Arc::new(LocalStorage::new(objects).await.unwrap());
        let config = Config {
            environment: Environment::LocalDev,
            ffmpeg_path: "/bin/true".to_string(),
            scratch_root: scratch.to_path_buf(),
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: Some(objects.to_string_lossy().into_owned()),
        };
        Pipeline::new(&config, storage)
    }

    #[tokio::test]
    async fn test_validate_empty_filename() {
        let objects = tempdir().unwrap();
        let scratch = tempdir().unwrap();
        let pipeline = pipeline(objects.path(), scratch.path()).await;

        let request = RenderRequest {
            filename: String::new(),
            tasks: vec!["h264_mp4_light".to_string()],
        };
        assert!(matches!(
            pipeline.validate(&request),
            Err(PipelineError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_validate_empty_task_list() {
        let objects = tempdir().unwrap();
        let scratch = tempdir().unwrap();
        let pipeline = pipeline(objects.path(), scratch.path()).await;

        let request = RenderRequest {
            filename: "clip.mov".to_string(),
            tasks: vec![],
        };
        assert!(matches!(
            pipeline.validate(&request),
            Err(PipelineError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_validate_unknown_task() {
        let objects = tempdir().unwrap();
        let scratch = tempdir().unwrap();
        let pipeline = pipeline(objects.path(), scratch.path()).await;

        let request = RenderRequest {
            filename: "clip.mov".to_string(),
            tasks: vec!["vp9_webm".to_string()],
        };
        let err = pipeline.validate(&request).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidRequest(_)));
        assert!(err.to_string().contains("vp9_webm"));
    }

    #[tokio::test]
    async fn test_validate_decodes_and_takes_basename() {
        let objects = tempdir().unwrap();
        let scratch = tempdir().unwrap();
        let pipeline = pipeline(objects.path(), scratch.path()).await;

        let request = RenderRequest {
            filename: "my%20clip.mov".to_string(),
            tasks: vec!["h264_mp4_light".to_string()],
        };
        assert_eq!(pipeline.validate(&request).unwrap(), "my clip.mov");

        let request = RenderRequest {
            filename: "nested/path/clip.mov".to_string(),
            tasks: vec!["h264_mp4_light".to_string()],
        };
        assert_eq!(pipeline.validate(&request).unwrap(), "clip.mov");
    }

    #[tokio::test]
    async fn test_validate_rejects_bare_slash() {
        let objects = tempdir().unwrap();
        let scratch = tempdir().unwrap();
        let pipeline = pipeline(objects.path(), scratch.path()).await;

        let request = RenderRequest {
            filename: "%2F".to_string(),
            tasks: vec!["h264_mp4_light".to_string()],
        };
        assert!(matches!(
            pipeline.validate(&request),
            Err(PipelineError::InvalidRequest(_))
        ));
    }
}
