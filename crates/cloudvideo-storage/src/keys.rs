//! Shared key derivation for the fixed remote storage layout.
//!
//! Sources are read from `uploads/{filename}`; rendered objects are written
//! to `rendered/{stem}_rendered.mp4`.

use std::path::Path;

use cloudvideo_core::constants::{
    RENDERED_EXTENSION, RENDERED_PREFIX, RENDERED_SUFFIX, SOURCE_PREFIX,
};

/// Key of the source object for a given filename.
pub fn source_key(filename: &str) -> String {
    format!("{}/{}", SOURCE_PREFIX, filename)
}

/// Rendered-object name derived from a source filename: stem + fixed suffix
/// + fixed extension.
pub fn rendered_name(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    format!("{}{}.{}", stem, RENDERED_SUFFIX, RENDERED_EXTENSION)
}

/// Key under which the rendered object for a given source filename is stored.
pub fn rendered_key(filename: &str) -> String {
    format!("{}/{}", RENDERED_PREFIX, rendered_name(filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_key() {
        assert_eq!(source_key("clip.mov"), "uploads/clip.mov");
    }

    #[test]
    fn test_rendered_name_replaces_extension() {
        assert_eq!(rendered_name("clip.mov"), "clip_rendered.mp4");
        assert_eq!(rendered_name("clip"), "clip_rendered.mp4");
        assert_eq!(rendered_name("a.b.mov"), "a.b_rendered.mp4");
    }

    #[test]
    fn test_rendered_key() {
        assert_eq!(rendered_key("clip.mov"), "rendered/clip_rendered.mp4");
    }
}
