//! Error types module
//!
//! The fatal error taxonomy for one pipeline invocation. Every variant aborts
//! the pipeline and is surfaced to the trigger as a single failure message.
//! Cleanup problems are deliberately not represented here: they are logged as
//! warnings and never propagated.

/// Fatal pipeline errors, one per failing stage.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Key not found in bucket: {0}")]
    NotFound(String),

    #[error("Out of space: {available} bytes available, {required} bytes required")]
    OutOfSpace { available: u64, required: u64 },

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Rendering failed: {0}")]
    RenderFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),
}

impl PipelineError {
    /// Stage name for structured logging.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::InvalidRequest(_) => "validate",
            PipelineError::NotFound(_) | PipelineError::OutOfSpace { .. } => "capacity",
            PipelineError::DownloadFailed(_) => "fetch",
            PipelineError::RenderFailed(_) => "render",
            PipelineError::UploadFailed(_) => "store",
        }
    }
}
