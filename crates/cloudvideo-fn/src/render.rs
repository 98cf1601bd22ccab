//! Transform invoker
//!
//! Runs the external ffmpeg binary as a child process with the argument
//! template of the requested task, blocking until it exits. stdout and stderr
//! are captured separately. Any bytes on stderr fail the render regardless of
//! exit status; ffmpeg runs with `-loglevel quiet` so routine progress output
//! never lands there.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use cloudvideo_core::task::{INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER};
use cloudvideo_core::TaskCatalog;

pub struct FfmpegRenderer {
    ffmpeg_path: String,
    scratch_root: PathBuf,
    catalog: TaskCatalog,
}

impl FfmpegRenderer {
    pub fn new(ffmpeg_path: String, scratch_root: impl Into<PathBuf>, catalog: TaskCatalog) -> Self {
        Self {
            ffmpeg_path,
            scratch_root: scratch_root.into(),
            catalog,
        }
    }

    /// Render `input_path` to `output_path` with the named task's template.
    ///
    /// A missing input file is a prior-stage contract violation and a hard
    /// error, not a recoverable `false`. `Ok(false)` means the child wrote
    /// diagnostics; the output file must not be trusted in that case.
    pub async fn render(
        &self,
        input_path: &Path,
        output_path: &Path,
        task_name: &str,
    ) -> Result<bool> {
        if !input_path.is_file() {
            bail!("video file not downloaded: {}", input_path.display());
        }

        // Unknown names are rejected during request validation; reaching this
        // point with one is a caller bug.
        let template = self
            .catalog
            .resolve_command(task_name)
            .with_context(|| format!("unknown task: {}", task_name))?;

        let input = input_path.to_string_lossy();
        let output = output_path.to_string_lossy();
        let args: Vec<String> = template
            .iter()
            .map(|arg| match arg.as_str() {
                INPUT_PLACEHOLDER => input.to_string(),
                OUTPUT_PLACEHOLDER => output.to_string(),
                _ => arg.clone(),
            })
            .collect();

        tracing::debug!(
            task = %task_name,
            input = %input_path.display(),
            output = %output_path.display(),
            "Invoking ffmpeg"
        );

        let child_output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .current_dir(&self.scratch_root)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .context("Failed to execute ffmpeg")?;

        if !child_output.stderr.is_empty() {
            tracing::error!(
                task = %task_name,
                stderr = %String::from_utf8_lossy(&child_output.stderr),
                "ffmpeg wrote diagnostics"
            );
            return Ok(false);
        }

        tracing::debug!(
            task = %task_name,
            stdout = %String::from_utf8_lossy(&child_output.stdout),
            "ffmpeg finished"
        );

        Ok(true)
    }

    /// Version string of the configured ffmpeg binary, or "unknown".
    pub async fn ffmpeg_version(&self) -> String {
        let output = Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        let Ok(output) = output else {
            return "unknown".to_string();
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .strip_prefix("ffmpeg version ")
            .and_then(|rest| rest.split_whitespace().next())
            .unwrap_or("unknown")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[cfg(unix)]
    fn write_stub_ffmpeg(dir: &Path, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("ffmpeg");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    // Copies the -i argument to the last argument, silently.
    const COPY_BODY: &str = r#"
in=""; prev=""; last=""
for a in "$@"; do
  [ "$prev" = "-i" ] && in="$a"
  prev="$a"; last="$a"
done
cp "$in" "$last"
"#;

    fn renderer(ffmpeg_path: String, scratch: &Path) -> FfmpegRenderer {
        FfmpegRenderer::new(ffmpeg_path, scratch, TaskCatalog::new())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_render_success_without_diagnostics() {
        let scratch = tempdir().unwrap();
        let ffmpeg = write_stub_ffmpeg(scratch.path(), COPY_BODY);
        let renderer = renderer(ffmpeg, scratch.path());

        let input = scratch.path().join("clip.mov");
        let output = scratch.path().join("clip_rendered.mp4");
        tokio::fs::write(&input, b"source").await.unwrap();

        let ok = renderer
            .render(&input, &output, "h264_mp4_light")
            .await
            .unwrap();
        assert!(ok);
        assert_eq!(tokio::fs::read(&output).await.unwrap(), b"source");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_render_any_stderr_is_failure() {
        let scratch = tempdir().unwrap();
        // Writes a partial output, then diagnostics; exit status is still 0.
        let body = r#"
last=""
for a in "$@"; do last="$a"; done
echo partial > "$last"
echo "Conversion failed!" >&2
exit 0
"#;
        let ffmpeg = write_stub_ffmpeg(scratch.path(), body);
        let renderer = renderer(ffmpeg, scratch.path());

        let input = scratch.path().join("clip.mov");
        let output = scratch.path().join("clip_rendered.mp4");
        tokio::fs::write(&input, b"source").await.unwrap();

        let ok = renderer
            .render(&input, &output, "h264_mp4_light")
            .await
            .unwrap();
        assert!(!ok);
        // The partial output exists but was reported as failure.
        assert!(output.exists());
    }

    #[tokio::test]
    async fn test_render_missing_input_is_hard_error() {
        let scratch = tempdir().unwrap();
        let renderer = renderer("/bin/true".to_string(), scratch.path());

        let input = scratch.path().join("missing.mov");
        let output = scratch.path().join("out.mp4");
        let result = renderer.render(&input, &output, "h264_mp4_light").await;
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_ffmpeg_version_parse() {
        let scratch = tempdir().unwrap();
        let body = r#"
if [ "$1" = "-version" ]; then
  echo "ffmpeg version 6.1.1 Copyright (c) 2000-2023 the FFmpeg developers"
  exit 0
fi
"#;
        let ffmpeg = write_stub_ffmpeg(scratch.path(), body);
        let renderer = renderer(ffmpeg, scratch.path());

        assert_eq!(renderer.ffmpeg_version().await, "6.1.1");
    }

    #[tokio::test]
    async fn test_ffmpeg_version_unknown_for_missing_binary() {
        let scratch = tempdir().unwrap();
        let renderer = renderer("/nonexistent/ffmpeg".to_string(), scratch.path());
        assert_eq!(renderer.ffmpeg_version().await, "unknown");
    }
}
