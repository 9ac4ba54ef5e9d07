//! Pipeline configuration.

use std::path::PathBuf;

/// Configuration for pipeline execution.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum concurrent transcoder invocations per job.
    pub max_transcode_parallel: usize,
    /// Root directory under which job arenas are allocated.
    pub work_root: PathBuf,
    /// Root path component of remote prefixes (`<prefix_root>/<content_id>`).
    pub prefix_root: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_transcode_parallel: 4,
            work_root: std::env::temp_dir().join("vredact"),
            prefix_root: "vods".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_transcode_parallel: std::env::var("VREDACT_MAX_TRANSCODE_PARALLEL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_transcode_parallel),
            work_root: std::env::var("VREDACT_WORK_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_root),
            prefix_root: std::env::var("VREDACT_PREFIX_ROOT")
                .unwrap_or(defaults.prefix_root),
        }
    }

    /// Remote prefix for a content id.
    pub fn prefix_for(&self, content_id: &str) -> String {
        format!("{}/{}", self.prefix_root.trim_matches('/'), content_id)
    }
}
