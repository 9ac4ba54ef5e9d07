//! Range extraction into MPEG-TS chunks.

use std::path::Path;

use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Extract `[start, end)` from the source into a re-encoded MPEG-TS chunk.
///
/// Audio and video are both preserved. The chunk is re-encoded (H.264 +
/// AAC) rather than stream-copied so that every chunk starts on a
/// keyframe, which HLS playback requires at segment boundaries.
pub async fn extract_range(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    start: f64,
    end: f64,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();
    let duration = end - start;

    info!(
        "Extracting range: {} -> {} ({:.3}s - {:.3}s)",
        input.display(),
        output.display(),
        start,
        end
    );

    let cmd = FfmpegCommand::new(output)
        .input(input)
        .seek(start)
        .read_limit(duration)
        .video_codec("libx264")
        .preset("veryfast")
        .crf(23)
        .audio_codec("aac")
        .audio_bitrate("128k")
        .format("mpegts");

    FfmpegRunner::new().run(&cmd).await
}
