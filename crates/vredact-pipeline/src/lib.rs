//! Job orchestration for the vredact pipeline.
//!
//! Wires the planner, transcoder wrapper, blob store and lock store into
//! the three caller-facing flows: publish, modify (republish in place)
//! and delete. Each request runs as one [`Job`] with an isolated working
//! arena and a stable remote prefix.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod generate;
pub mod job;

pub use config::PipelineConfig;
pub use coordinator::{Coordinator, PublishOutcome, SOURCE_ARTIFACT};
pub use error::{PipelineError, PipelineResult};
pub use generate::{chunk_name_for, generate_artifacts};
pub use job::Job;
