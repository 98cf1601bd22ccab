//! Cloudvideo Storage Library
//!
//! Storage abstraction and backends for the transcode function. The pipeline
//! moves whole files between remote storage and a local scratch directory, so
//! the trait surface is path-based: metadata-only size lookup, download to a
//! local path, upload from a local path.
//!
//! # Storage key format
//!
//! Source objects live under `uploads/{filename}`; rendered objects under
//! `rendered/{stem}_rendered.mp4`. Keys must not contain `..` or a leading
//! `/`. Key derivation is centralized in the `keys` module so the pipeline
//! and all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use cloudvideo_core::StorageBackend;
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
