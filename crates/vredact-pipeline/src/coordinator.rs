//! Publish and republish orchestration.

use std::path::Path;

use tracing::{info, Instrument};

use vredact_locks::{BlackoutEntry, CreateLockRecord, LockStoreClient};
use vredact_media::{
    build_playlist, localize_playlist, probe_source, rewrite_playlist, PlaylistVariant,
};
use vredact_models::{
    plan_timeline, BlackoutInterval, ContentId, JobStage, BLACKOUT_PLAYLIST, OUTPUT_PLAYLIST,
};
use vredact_storage::BlobClient;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::generate::generate_artifacts;
use crate::job::Job;

/// Local name under which the source asset is kept alongside the chunks,
/// so a later modify can re-fetch it from the job prefix.
pub const SOURCE_ARTIFACT: &str = "source.mp4";

/// Result of a successful publish or republish.
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    /// Stable content identifier; the remote prefix derives from it.
    pub content_id: ContentId,
    /// Lock store record id.
    pub record_id: String,
    /// URL of the unmodified playlist.
    pub output_url: String,
    /// URL of the redacted playlist.
    pub blackout_url: String,
    /// Number of chunks in the published layout.
    pub chunk_count: usize,
}

/// URLs produced by one pipeline pass.
struct PipelineUrls {
    output_url: String,
    blackout_url: String,
    source_url: String,
    chunk_count: usize,
}

/// Orchestrates create, modify and delete flows against the blob store
/// and the lock store.
pub struct Coordinator {
    blob: BlobClient,
    locks: LockStoreClient,
    config: PipelineConfig,
}

impl Coordinator {
    pub fn new(blob: BlobClient, locks: LockStoreClient, config: PipelineConfig) -> Self {
        Self {
            blob,
            locks,
            config,
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> PipelineResult<Self> {
        Ok(Self::new(
            BlobClient::from_env()?,
            LockStoreClient::from_env()?,
            PipelineConfig::from_env(),
        ))
    }

    /// Publish a new source asset as two synchronized presentations.
    pub async fn publish(
        &self,
        source: &Path,
        intervals: &[BlackoutInterval],
        platform_id: &str,
        user_id: &str,
    ) -> PipelineResult<PublishOutcome> {
        let content_id = ContentId::new();
        let prefix = self.config.prefix_for(content_id.as_str());
        let mut job = Job::new(content_id.clone(), prefix, &self.config.work_root)?;

        let result = self
            .execute_publish(&mut job, source, intervals, platform_id, user_id)
            .await;
        match result {
            Ok(outcome) => {
                job.complete();
                Ok(outcome)
            }
            Err(e) => {
                job.fail(&e);
                Err(e)
            }
        }
    }

    async fn execute_publish(
        &self,
        job: &mut Job,
        source: &Path,
        intervals: &[BlackoutInterval],
        platform_id: &str,
        user_id: &str,
    ) -> PipelineResult<PublishOutcome> {
        let span = job.span();
        let urls = self
            .run_pipeline(job, source, intervals, false)
            .instrument(span)
            .await?;

        let record = CreateLockRecord {
            platform_id: platform_id.to_string(),
            user_id: user_id.to_string(),
            content_id: job.content_id().to_string(),
            original_locator: urls.source_url,
            redacted_locator: urls.blackout_url.clone(),
            blackout_intervals: intervals.iter().map(BlackoutEntry::from_interval).collect(),
        };
        let record_id = self.locks.create(&record).await?;

        Ok(PublishOutcome {
            content_id: job.content_id().clone(),
            record_id,
            output_url: urls.output_url,
            blackout_url: urls.blackout_url,
            chunk_count: urls.chunk_count,
        })
    }

    /// Replace the blackout interval set of an already-published asset.
    ///
    /// Re-runs the full pipeline against the same prefix; the prefix is
    /// cleared right before re-upload so stale chunks from a previous,
    /// differently-sized layout cannot linger. The lock record is updated
    /// only after the republish succeeds.
    pub async fn modify(
        &self,
        content_id: &str,
        new_intervals: &[BlackoutInterval],
    ) -> PipelineResult<PublishOutcome> {
        let record = self.locks.find_by_content_id(content_id).await?;

        let prefix = self.config.prefix_for(content_id);
        let mut job = Job::new(
            ContentId::from_string(content_id),
            prefix,
            &self.config.work_root,
        )?;

        let result = self.execute_modify(&mut job, &record.id, &record.original_locator, new_intervals).await;
        match result {
            Ok(outcome) => {
                job.complete();
                Ok(outcome)
            }
            Err(e) => {
                job.fail(&e);
                Err(e)
            }
        }
    }

    async fn execute_modify(
        &self,
        job: &mut Job,
        record_id: &str,
        original_locator: &str,
        new_intervals: &[BlackoutInterval],
    ) -> PipelineResult<PublishOutcome> {
        // Fetch the original source before the prefix is cleared.
        let local_source = job.arena().artifact_path(SOURCE_ARTIFACT);
        let source_key = self.blob.key_for_locator(original_locator)?;
        self.blob.download_file(&source_key, &local_source).await?;

        let span = job.span();
        let urls = self
            .run_pipeline(job, &local_source, new_intervals, true)
            .instrument(span)
            .await?;

        self.locks
            .update_redacted_locator(
                record_id,
                &urls.blackout_url,
                new_intervals
                    .iter()
                    .map(BlackoutEntry::from_interval)
                    .collect(),
            )
            .await?;

        Ok(PublishOutcome {
            content_id: job.content_id().clone(),
            record_id: record_id.to_string(),
            output_url: urls.output_url,
            blackout_url: urls.blackout_url,
            chunk_count: urls.chunk_count,
        })
    }

    /// Fetch a published playlist and re-localize its chunk references.
    ///
    /// Inverse of the rewrite step: lines carrying this content's
    /// published URL prefix are reduced back to local chunk names, so
    /// the document can be reprocessed like a freshly built one.
    pub async fn fetch_playlist(&self, content_id: &str, name: &str) -> PipelineResult<String> {
        let prefix = self.config.prefix_for(content_id);
        let key = vredact_storage::join_key(&prefix, name)?;
        let bytes = self.blob.download_bytes(&key).await?;
        let document = String::from_utf8(bytes).map_err(|e| {
            PipelineError::job_failed(format!("playlist {} is not valid UTF-8: {}", key, e))
        })?;
        Ok(localize_playlist(&document, &self.blob.public_url(&prefix)))
    }

    /// Remove all published artifacts for a content id.
    ///
    /// The lock record itself is left in place; only the remote prefix is
    /// emptied. Returns the number of objects deleted.
    pub async fn delete(&self, content_id: &str) -> PipelineResult<u32> {
        let record = self.locks.find_by_content_id(content_id).await?;
        let prefix = self.config.prefix_for(&record.content_id);
        let deleted = self.blob.delete_prefix(&prefix).await?;
        info!(content_id, deleted, "Deleted published artifacts");
        Ok(deleted)
    }

    /// One full pipeline pass: plan, generate, publish, rewrite.
    ///
    /// Two-phase publish: phase 1 uploads chunks and the raw playlists so
    /// every chunk URL becomes known, phase 2 overwrites the playlists at
    /// their fixed keys with the rewritten documents. A playlist cannot
    /// reference final URLs until every chunk has one.
    async fn run_pipeline(
        &self,
        job: &mut Job,
        source: &Path,
        intervals: &[BlackoutInterval],
        clear_prefix: bool,
    ) -> PipelineResult<PipelineUrls> {
        // Planning
        let info = probe_source(source).await?;
        let segments = plan_timeline(info.duration, intervals)?;
        info!(
            job_id = %job.id(),
            duration = info.duration,
            resolution = %info.resolution(),
            segments = segments.len(),
            blackouts = segments.iter().filter(|s| s.blackout).count(),
            "Planned segment timeline"
        );

        // Generating
        job.advance(JobStage::Generating)?;
        let mut artifacts = generate_artifacts(
            source,
            &info,
            &segments,
            job.arena(),
            self.config.max_transcode_parallel,
        )
        .await?;

        // Publishing (phase 1: chunks, raw playlists, source)
        job.advance(JobStage::Publishing)?;
        let normal = build_playlist(&segments, PlaylistVariant::Normal);
        let redacted = build_playlist(&segments, PlaylistVariant::Redacted);

        let normal_path = job.arena().artifact_path(OUTPUT_PLAYLIST);
        let redacted_path = job.arena().artifact_path(BLACKOUT_PLAYLIST);
        tokio::fs::write(&normal_path, &normal).await?;
        tokio::fs::write(&redacted_path, &redacted).await?;

        artifacts.push((OUTPUT_PLAYLIST.to_string(), normal_path));
        artifacts.push((BLACKOUT_PLAYLIST.to_string(), redacted_path));
        artifacts.push((SOURCE_ARTIFACT.to_string(), source.to_path_buf()));

        if clear_prefix {
            self.blob.delete_prefix(job.prefix()).await?;
        }
        let map = self.blob.publish_artifacts(job.prefix(), &artifacts).await?;

        // Rewriting (phase 2: overwrite playlists with published URLs)
        job.advance(JobStage::Rewriting)?;
        let output_url = self
            .blob
            .overwrite_playlist(job.prefix(), OUTPUT_PLAYLIST, rewrite_playlist(&normal, &map))
            .await?;
        let blackout_url = self
            .blob
            .overwrite_playlist(
                job.prefix(),
                BLACKOUT_PLAYLIST,
                rewrite_playlist(&redacted, &map),
            )
            .await?;

        let source_url = map
            .get(SOURCE_ARTIFACT)
            .map(str::to_string)
            .ok_or_else(|| {
                PipelineError::job_failed("source artifact missing from publish map")
            })?;

        Ok(PipelineUrls {
            output_url,
            blackout_url,
            source_url,
            chunk_count: segments.len(),
        })
    }
}
