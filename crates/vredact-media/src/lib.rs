//! FFmpeg CLI wrapper for the vredact pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building and execution
//! - Source probing via FFprobe (duration, resolution, frame rate)
//! - Range extraction into MPEG-TS chunks
//! - Synthetic filler chunk generation (black video, silent audio)
//! - HLS playlist rendering, URL rewriting and re-localization
//! - Job-scoped working arenas with guaranteed cleanup

pub mod arena;
pub mod command;
pub mod error;
pub mod extract;
pub mod filler;
pub mod playlist;
pub mod probe;

pub use arena::JobArena;
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use extract::extract_range;
pub use filler::synthesize_filler;
pub use playlist::{build_playlist, localize_playlist, rewrite_playlist, PlaylistVariant};
pub use probe::{probe_source, SourceInfo};
