//! Fixed task catalog
//!
//! A task is a named, pre-defined transcoding profile: an ordered ffmpeg
//! argument template with `{input}` and `{output}` placeholders. The catalog
//! is a closed, read-only table built once at startup; unknown names resolve
//! to `None` and must be rejected by the caller before invocation.

use std::collections::HashMap;

/// Placeholder token replaced with the local source path.
pub const INPUT_PLACEHOLDER: &str = "{input}";
/// Placeholder token replaced with the local rendered path.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Read-only mapping from task name to its ffmpeg argument template.
#[derive(Debug, Clone)]
pub struct TaskCatalog {
    tasks: HashMap<&'static str, Vec<String>>,
}

fn h264_mp4_template(preset: &str, crf: &str) -> Vec<String> {
    // ffmpeg runs with -loglevel quiet: anything the child writes to stderr
    // is treated as a render failure downstream.
    [
        "-loglevel",
        "quiet",
        "-y",
        "-i",
        INPUT_PLACEHOLDER,
        "-c:v",
        "libx264",
        "-preset",
        preset,
        "-crf",
        crf,
        "-c:a",
        "aac",
        OUTPUT_PLACEHOLDER,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl TaskCatalog {
    /// Build the catalog. Two quality presets trading encoding speed against
    /// output quality.
    pub fn new() -> Self {
        let mut tasks = HashMap::new();
        tasks.insert("h264_mp4_light", h264_mp4_template("veryfast", "28"));
        tasks.insert("h264_mp4_high", h264_mp4_template("slow", "18"));
        TaskCatalog { tasks }
    }

    /// Look up the argument template for a task. `None` for unknown names.
    pub fn resolve_command(&self, task_name: &str) -> Option<&[String]> {
        self.tasks.get(task_name).map(|args| args.as_slice())
    }

    /// Whether the catalog contains the given task name.
    pub fn contains(&self, task_name: &str) -> bool {
        self.tasks.contains_key(task_name)
    }

    /// All known task names, sorted for stable output.
    pub fn task_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.tasks.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for TaskCatalog {
    fn default() -> Self {
        Self::new()
    }
}
