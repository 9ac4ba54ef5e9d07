//! Job identifiers and lifecycle stages.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one pipeline job (one create/modify request).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable content identifier; the remote prefix is derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ContentId(pub String);

impl ContentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ContentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pipeline stage of a job.
///
/// Stages advance strictly forward; `Error` is reachable from any stage and
/// terminal. There is no automatic resume of a failed job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStage {
    /// Computing the segment timeline.
    #[default]
    Planning,
    /// Materializing one chunk per segment.
    Generating,
    /// Phase-1 upload of chunks and raw playlists.
    Publishing,
    /// Rewriting playlists with published URLs and re-uploading them.
    Rewriting,
    /// Job finished, both presentation URLs are live.
    Done,
    /// Terminal failure.
    Error,
}

impl JobStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStage::Planning => "planning",
            JobStage::Generating => "generating",
            JobStage::Publishing => "publishing",
            JobStage::Rewriting => "rewriting",
            JobStage::Done => "done",
            JobStage::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStage::Done | JobStage::Error)
    }
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_unique() {
        assert_ne!(JobId::new(), JobId::new());
    }

    #[test]
    fn test_stage_terminality() {
        assert!(!JobStage::Planning.is_terminal());
        assert!(!JobStage::Rewriting.is_terminal());
        assert!(JobStage::Done.is_terminal());
        assert!(JobStage::Error.is_terminal());
    }

    #[test]
    fn test_stage_serde_names() {
        let json = serde_json::to_string(&JobStage::Publishing).unwrap();
        assert_eq!(json, "\"publishing\"");
    }
}
