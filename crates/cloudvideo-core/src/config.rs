//! Configuration module
//!
//! Environment-driven configuration for the transcode function. A single
//! flag — the presence of `LAMBDA_TASK_ROOT`, observed once at startup —
//! selects the deployed or local-development defaults for the ffmpeg
//! executable path. Everything else can be overridden per variable.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::storage_types::StorageBackend;

const LAMBDA_FFMPEG_PATH: &str = "/opt/bin/ffmpeg";
const LOCAL_FFMPEG_PATH: &str = "/opt/homebrew/bin/ffmpeg";
const DEFAULT_SCRATCH_ROOT: &str = "/tmp";

/// Execution environment, selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Running inside a deployed Lambda execution environment.
    Lambda,
    /// Running on a developer machine.
    LocalDev,
}

impl Environment {
    /// Detect the environment from `LAMBDA_TASK_ROOT`.
    pub fn detect() -> Self {
        if env::var_os("LAMBDA_TASK_ROOT").is_some() {
            Environment::Lambda
        } else {
            Environment::LocalDev
        }
    }

    fn default_ffmpeg_path(self) -> &'static str {
        match self {
            Environment::Lambda => LAMBDA_FFMPEG_PATH,
            Environment::LocalDev => LOCAL_FFMPEG_PATH,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    /// Path to the ffmpeg executable.
    pub ffmpeg_path: String,
    /// Local directory for transient input/output files.
    pub scratch_root: PathBuf,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers
    pub local_storage_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let environment = Environment::detect();

        let ffmpeg_path = env::var("FFMPEG_PATH")
            .unwrap_or_else(|_| environment.default_ffmpeg_path().to_string());

        let scratch_root = env::var("SCRATCH_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SCRATCH_ROOT));

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => StorageBackend::from_str(&value)?,
            Err(_) => StorageBackend::S3,
        };

        let config = Config {
            environment,
            ffmpeg_path,
            scratch_root,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok().or(env::var("AWS_REGION").ok()),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.ffmpeg_path.is_empty() {
            anyhow::bail!("FFMPEG_PATH must not be empty");
        }
        if self.scratch_root.as_os_str().is_empty() {
            anyhow::bail!("SCRATCH_ROOT must not be empty");
        }
        if self.storage_backend == StorageBackend::S3 && self.s3_bucket.is_none() {
            anyhow::bail!("S3_BUCKET not configured");
        }
        if self.storage_backend == StorageBackend::Local && self.local_storage_path.is_none() {
            anyhow::bail!("LOCAL_STORAGE_PATH not configured");
        }
        Ok(())
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.ffmpeg_path
    }

    pub fn scratch_root(&self) -> &std::path::Path {
        &self.scratch_root
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }
}
