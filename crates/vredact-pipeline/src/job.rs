//! Per-request job state.

use std::path::Path;

use tracing::{error, info, Span};

use vredact_media::JobArena;
use vredact_models::{ContentId, JobId, JobStage};

use crate::error::{PipelineError, PipelineResult};

/// Unit of work for one create/modify request.
///
/// Owns an isolated working arena and the job's remote prefix. The arena
/// is released when the job is dropped, on the success and error paths
/// alike. Stages advance strictly forward; a failed job lands in
/// `JobStage::Error` and stays there.
#[derive(Debug)]
pub struct Job {
    id: JobId,
    content_id: ContentId,
    prefix: String,
    arena: JobArena,
    stage: JobStage,
}

impl Job {
    /// Create a job with a fresh arena under `work_root`.
    pub fn new(
        content_id: ContentId,
        prefix: String,
        work_root: impl AsRef<Path>,
    ) -> PipelineResult<Self> {
        let arena = JobArena::create(work_root)?;
        let job = Self {
            id: JobId::new(),
            content_id,
            prefix,
            arena,
            stage: JobStage::Planning,
        };
        info!(
            job_id = %job.id,
            content_id = %job.content_id,
            prefix = %job.prefix,
            "Job created"
        );
        Ok(job)
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn content_id(&self) -> &ContentId {
        &self.content_id
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn arena(&self) -> &JobArena {
        &self.arena
    }

    pub fn stage(&self) -> JobStage {
        self.stage
    }

    /// Tracing span carrying the job's identifiers.
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "job",
            job_id = %self.id,
            content_id = %self.content_id
        )
    }

    /// Advance to the next stage.
    ///
    /// Terminal stages never advance; a transition from a terminal stage
    /// is a caller bug and is rejected.
    pub fn advance(&mut self, next: JobStage) -> PipelineResult<()> {
        if self.stage.is_terminal() {
            return Err(PipelineError::job_failed(format!(
                "cannot advance job from terminal stage {}",
                self.stage
            )));
        }
        info!(
            job_id = %self.id,
            from = %self.stage,
            to = %next,
            "Job stage transition"
        );
        self.stage = next;
        Ok(())
    }

    /// Mark the job failed. Terminal; the arena is still torn down on drop.
    pub fn fail(&mut self, err: &PipelineError) {
        error!(
            job_id = %self.id,
            content_id = %self.content_id,
            stage = %self.stage,
            error = %err,
            "Job failed"
        );
        self.stage = JobStage::Error;
        metrics::counter!("vredact_jobs_failed_total").increment(1);
    }

    /// Mark the job done.
    pub fn complete(&mut self) {
        info!(job_id = %self.id, "Job completed");
        self.stage = JobStage::Done;
        metrics::counter!("vredact_jobs_completed_total").increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_job() -> Job {
        let root = std::env::temp_dir().join("vredact-test");
        Job::new(
            ContentId::from_string("content-1"),
            "vods/content-1".to_string(),
            root,
        )
        .unwrap()
    }

    #[test]
    fn test_stages_advance_forward() {
        let mut job = test_job();
        assert_eq!(job.stage(), JobStage::Planning);
        job.advance(JobStage::Generating).unwrap();
        job.advance(JobStage::Publishing).unwrap();
        job.advance(JobStage::Rewriting).unwrap();
        job.complete();
        assert_eq!(job.stage(), JobStage::Done);
    }

    #[test]
    fn test_terminal_stage_rejects_advance() {
        let mut job = test_job();
        job.fail(&PipelineError::job_failed("boom"));
        assert_eq!(job.stage(), JobStage::Error);
        assert!(job.advance(JobStage::Generating).is_err());
    }

    #[test]
    fn test_arena_removed_on_drop() {
        let arena_path;
        {
            let job = test_job();
            arena_path = job.arena().path().to_path_buf();
            assert!(arena_path.exists());
        }
        assert!(!arena_path.exists());
    }
}
