//! HLS media playlist rendering and URL rewriting.

use std::fmt::Write;

use vredact_models::{
    blackout_chunk_name, segment_chunk_name, PublishedArtifactMap, Segment,
};

/// Which of the two synchronized presentations to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistVariant {
    /// Unmodified presentation: every slot references its real chunk.
    Normal,
    /// Redacted presentation: blackout slots reference their filler chunk.
    Redacted,
}

/// Render a VOD media playlist for the given timeline.
///
/// Output format (HLS version 3):
/// - `#EXTM3U`, `#EXT-X-VERSION:3`
/// - `#EXT-X-TARGETDURATION` = ceiling of the longest segment duration
/// - `#EXT-X-MEDIA-SEQUENCE:0`, `#EXT-X-PLAYLIST-TYPE:VOD`
/// - per segment `#EXTINF:<duration,6dp>,` followed by the chunk name
/// - `#EXT-X-ENDLIST`
pub fn build_playlist(segments: &[Segment], variant: PlaylistVariant) -> String {
    let target_duration = segments
        .iter()
        .map(Segment::duration)
        .fold(0.0_f64, f64::max)
        .ceil() as u64;

    let mut out = String::new();
    writeln!(out, "#EXTM3U").unwrap();
    writeln!(out, "#EXT-X-VERSION:3").unwrap();
    writeln!(out, "#EXT-X-TARGETDURATION:{}", target_duration).unwrap();
    writeln!(out, "#EXT-X-MEDIA-SEQUENCE:0").unwrap();
    writeln!(out, "#EXT-X-PLAYLIST-TYPE:VOD").unwrap();

    for (index, segment) in segments.iter().enumerate() {
        let chunk = match variant {
            PlaylistVariant::Normal => segment_chunk_name(index),
            PlaylistVariant::Redacted => {
                if segment.blackout {
                    blackout_chunk_name(index)
                } else {
                    segment_chunk_name(index)
                }
            }
        };
        writeln!(out, "#EXTINF:{:.6},", segment.duration()).unwrap();
        writeln!(out, "{}", chunk).unwrap();
    }

    writeln!(out, "#EXT-X-ENDLIST").unwrap();
    out
}

/// Replace chunk-name lines with their published URLs.
///
/// Only lines that are exactly a known local artifact name are replaced;
/// directives and already-rewritten URLs pass through unchanged, so line
/// count and order are preserved and the operation is idempotent.
pub fn rewrite_playlist(document: &str, map: &PublishedArtifactMap) -> String {
    let mut out = String::with_capacity(document.len());
    for line in document.lines() {
        match map.get(line) {
            Some(url) => out.push_str(url),
            None => out.push_str(line),
        }
        out.push('\n');
    }
    out
}

/// Strip a remote URL prefix from chunk lines, re-localizing a previously
/// published playlist. The inverse of [`rewrite_playlist`].
pub fn localize_playlist(document: &str, remote_prefix: &str) -> String {
    let prefix = remote_prefix.trim_end_matches('/');
    let mut out = String::with_capacity(document.len());
    for line in document.lines() {
        match line.strip_prefix(prefix) {
            Some(rest) if !line.starts_with('#') => {
                out.push_str(rest.trim_start_matches('/'));
            }
            _ => out.push_str(line),
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vredact_models::{plan_timeline, BlackoutInterval};

    fn example_segments() -> Vec<Segment> {
        plan_timeline(
            100.0,
            &[
                BlackoutInterval::new(30.0, 45.0),
                BlackoutInterval::new(60.0, 70.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_normal_playlist_exact_format() {
        let segments = plan_timeline(10.0, &[]).unwrap();
        let doc = build_playlist(&segments, PlaylistVariant::Normal);

        let expected = "\
#EXTM3U
#EXT-X-VERSION:3
#EXT-X-TARGETDURATION:10
#EXT-X-MEDIA-SEQUENCE:0
#EXT-X-PLAYLIST-TYPE:VOD
#EXTINF:10.000000,
segment_000.ts
#EXT-X-ENDLIST
";
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_normal_references_all_segment_chunks() {
        let doc = build_playlist(&example_segments(), PlaylistVariant::Normal);
        for i in 0..5 {
            assert!(doc.contains(&segment_chunk_name(i)));
        }
        assert!(!doc.contains("blackout_"));
    }

    #[test]
    fn test_redacted_swaps_blackout_slots_only() {
        let doc = build_playlist(&example_segments(), PlaylistVariant::Redacted);
        assert!(doc.contains("segment_000.ts"));
        assert!(doc.contains("blackout_001.ts"));
        assert!(doc.contains("segment_002.ts"));
        assert!(doc.contains("blackout_003.ts"));
        assert!(doc.contains("segment_004.ts"));
        assert!(!doc.contains("segment_001.ts"));
        assert!(!doc.contains("segment_003.ts"));
    }

    #[test]
    fn test_full_span_blackout_variants() {
        let segments = plan_timeline(50.0, &[BlackoutInterval::new(0.0, 50.0)]).unwrap();
        let normal = build_playlist(&segments, PlaylistVariant::Normal);
        let redacted = build_playlist(&segments, PlaylistVariant::Redacted);
        assert!(normal.contains("segment_000.ts"));
        assert!(redacted.contains("blackout_000.ts"));
        assert!(!redacted.contains("segment_000.ts"));
    }

    #[test]
    fn test_target_duration_is_ceiling_of_max() {
        let segments = plan_timeline(100.0, &[BlackoutInterval::new(30.0, 45.5)]).unwrap();
        // Longest segment is the 54.5s tail.
        let doc = build_playlist(&segments, PlaylistVariant::Normal);
        assert!(doc.contains("#EXT-X-TARGETDURATION:55\n"));
    }

    #[test]
    fn test_rewrite_replaces_only_known_names() {
        let doc = build_playlist(&example_segments(), PlaylistVariant::Normal);
        let mut map = PublishedArtifactMap::new();
        for i in 0..5 {
            map.insert(
                segment_chunk_name(i),
                format!("https://cdn.example.com/v/{}", segment_chunk_name(i)),
            );
        }

        let rewritten = rewrite_playlist(&doc, &map);
        assert_eq!(doc.lines().count(), rewritten.lines().count());
        assert!(rewritten.contains("https://cdn.example.com/v/segment_000.ts"));
        assert!(!rewritten
            .lines()
            .any(|l| l == "segment_000.ts"));
        // Directives untouched.
        assert!(rewritten.contains("#EXT-X-TARGETDURATION:"));
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let doc = build_playlist(&example_segments(), PlaylistVariant::Redacted);
        let mut map = PublishedArtifactMap::new();
        for i in 0..5 {
            map.insert(
                segment_chunk_name(i),
                format!("https://cdn.example.com/v/{}", segment_chunk_name(i)),
            );
            map.insert(
                blackout_chunk_name(i),
                format!("https://cdn.example.com/v/{}", blackout_chunk_name(i)),
            );
        }

        let once = rewrite_playlist(&doc, &map);
        let twice = rewrite_playlist(&once, &map);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_localize_inverts_rewrite() {
        let doc = build_playlist(&example_segments(), PlaylistVariant::Normal);
        let prefix = "https://cdn.example.com/vods/abc";
        let mut map = PublishedArtifactMap::new();
        for i in 0..5 {
            map.insert(
                segment_chunk_name(i),
                format!("{}/{}", prefix, segment_chunk_name(i)),
            );
        }

        let rewritten = rewrite_playlist(&doc, &map);
        let localized = localize_playlist(&rewritten, prefix);
        assert_eq!(localized, doc);
    }
}
