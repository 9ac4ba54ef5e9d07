//! Shared data models for the vredact pipeline.
//!
//! This crate holds the types that cross crate boundaries: blackout
//! intervals and their normalization, the segment timeline planner,
//! artifact naming, and job identifiers. Everything here is pure and
//! synchronous; the external collaborators (transcoder, blob store,
//! lock store) live in their own crates.

pub mod artifact;
pub mod interval;
pub mod job;
pub mod timeline;

pub use artifact::{
    blackout_chunk_name, segment_chunk_name, ArtifactKind, PublishedArtifactMap,
    BLACKOUT_PLAYLIST, OUTPUT_PLAYLIST,
};
pub use interval::{normalize_intervals, BlackoutInterval, IntervalError, RedactionRequest};
pub use job::{ContentId, JobId, JobStage};
pub use timeline::{plan_timeline, Segment};
