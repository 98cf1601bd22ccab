//! Cloudvideo Core Library
//!
//! Shared types for the cloudvideo transcode function: the error taxonomy,
//! environment-driven configuration, the fixed task catalog, and the
//! remote storage key namespace constants.

pub mod config;
pub mod constants;
pub mod error;
pub mod storage_types;
pub mod task;

// Re-export commonly used types
pub use config::{Config, Environment};
pub use error::PipelineError;
pub use storage_types::StorageBackend;
pub use task::TaskCatalog;
