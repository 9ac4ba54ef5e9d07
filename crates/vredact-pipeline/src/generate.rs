//! Chunk generation over the planned timeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::info;

use vredact_media::{extract_range, synthesize_filler, JobArena, SourceInfo};
use vredact_models::{blackout_chunk_name, segment_chunk_name, Segment};

use crate::error::{PipelineError, PipelineResult};

/// Local chunk name for timeline slot `index`.
///
/// Naming is index-stable: slot `i` owns both the `segment_i` and
/// `blackout_i` name, but only the variant matching the segment kind is
/// ever generated.
pub fn chunk_name_for(segment: &Segment, index: usize) -> String {
    if segment.blackout {
        blackout_chunk_name(index)
    } else {
        segment_chunk_name(index)
    }
}

/// Materialize one chunk per segment into the job arena.
///
/// Segments are independent given a read-only source, so generation runs
/// under a bounded worker pool and is joined before publishing begins.
/// Any transcoder failure is fatal for the whole job; chunks already
/// written stay in the arena for teardown to discard.
pub async fn generate_artifacts(
    source: &Path,
    info: &SourceInfo,
    segments: &[Segment],
    arena: &JobArena,
    max_parallel: usize,
) -> PipelineResult<Vec<(String, PathBuf)>> {
    info!(
        segments = segments.len(),
        max_parallel, "Generating chunks"
    );

    let semaphore = Arc::new(Semaphore::new(max_parallel.max(1)));
    let mut tasks: JoinSet<PipelineResult<(usize, String, PathBuf)>> = JoinSet::new();

    for (index, segment) in segments.iter().enumerate() {
        let name = chunk_name_for(segment, index);
        let output = arena.artifact_path(&name);
        let source = source.to_path_buf();
        let segment = *segment;
        let info = *info;
        let semaphore = Arc::clone(&semaphore);

        tasks.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|_| PipelineError::job_failed("chunk worker pool closed"))?;

            if segment.blackout {
                synthesize_filler(&output, info.width, info.height, info.fps, segment.duration())
                    .await?;
            } else {
                extract_range(&source, &output, segment.start, segment.end).await?;
            }

            Ok((index, name, output))
        });
    }

    let mut chunks: Vec<Option<(String, PathBuf)>> = vec![None; segments.len()];
    while let Some(joined) = tasks.join_next().await {
        let (index, name, path) = joined
            .map_err(|e| PipelineError::job_failed(format!("chunk task panicked: {}", e)))??;
        chunks[index] = Some((name, path));
    }

    chunks
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| {
                PipelineError::job_failed(format!("chunk slot {} was never generated", index))
            })
        })
        .collect()
}
