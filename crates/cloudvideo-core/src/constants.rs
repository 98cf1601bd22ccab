//! Fixed remote storage layout and derived-name constants.
//!
//! Source objects live under `uploads/`; rendered objects are written under
//! `rendered/` using the source stem plus a fixed suffix and extension.

/// Prefix under which source objects are uploaded.
pub const SOURCE_PREFIX: &str = "uploads";

/// Prefix under which rendered objects are written.
pub const RENDERED_PREFIX: &str = "rendered";

/// Suffix appended to the source stem for the rendered object name.
pub const RENDERED_SUFFIX: &str = "_rendered";

/// Extension of every rendered object.
pub const RENDERED_EXTENSION: &str = "mp4";
