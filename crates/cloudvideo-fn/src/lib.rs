//! Cloudvideo transcode function
//!
//! One invocation runs a linear pipeline: validate the request, check local
//! capacity, fetch the source object into scratch, render it with ffmpeg,
//! store the result, and clear scratch. Each stage fully completes before the
//! next begins; the first fatal failure aborts the run.

pub mod capacity;
pub mod pipeline;
pub mod render;
pub mod scratch;
pub mod telemetry;
pub mod transfer;

pub use pipeline::{Pipeline, RenderRequest, RenderResponse};
