//! Segment timeline planning.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::interval::{normalize_intervals, BlackoutInterval, IntervalError};

/// One contiguous slice of media time in the planned timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds (exclusive).
    pub end: f64,
    /// Whether this segment is replaced by filler in the redacted presentation.
    pub blackout: bool,
}

impl Segment {
    pub fn content(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            blackout: false,
        }
    }

    pub fn blackout(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            blackout: true,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Plan a gapless, non-overlapping segment timeline covering `[0, duration)`.
///
/// Intervals are normalized first (sorted, clamped, merged), so the cursor
/// walk below always sees sorted disjoint input. Every interval becomes one
/// blackout segment; the space between intervals becomes content segments.
pub fn plan_timeline(
    duration: f64,
    intervals: &[BlackoutInterval],
) -> Result<Vec<Segment>, IntervalError> {
    let intervals = normalize_intervals(duration, intervals)?;

    let mut segments = Vec::with_capacity(intervals.len() * 2 + 1);
    let mut cursor = 0.0_f64;

    for iv in &intervals {
        if iv.start > cursor {
            segments.push(Segment::content(cursor, iv.start));
        }
        segments.push(Segment::blackout(iv.start, iv.end));
        cursor = iv.end;
    }

    if cursor < duration {
        segments.push(Segment::content(cursor, duration));
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_contiguous(segments: &[Segment], duration: f64) {
        assert!(!segments.is_empty());
        assert_eq!(segments[0].start, 0.0);
        assert_eq!(segments.last().unwrap().end, duration);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end, pair[1].start, "gap or overlap in timeline");
        }
        for seg in segments {
            assert!(seg.duration() > 0.0, "zero-duration segment");
        }
    }

    #[test]
    fn test_plan_no_intervals() {
        let segments = plan_timeline(10.0, &[]).unwrap();
        assert_eq!(segments, vec![Segment::content(0.0, 10.0)]);
    }

    #[test]
    fn test_plan_two_intervals() {
        let segments = plan_timeline(
            100.0,
            &[
                BlackoutInterval::new(30.0, 45.0),
                BlackoutInterval::new(60.0, 70.0),
            ],
        )
        .unwrap();

        assert_eq!(
            segments,
            vec![
                Segment::content(0.0, 30.0),
                Segment::blackout(30.0, 45.0),
                Segment::content(45.0, 60.0),
                Segment::blackout(60.0, 70.0),
                Segment::content(70.0, 100.0),
            ]
        );
        assert_contiguous(&segments, 100.0);
    }

    #[test]
    fn test_plan_full_span_blackout() {
        let segments = plan_timeline(50.0, &[BlackoutInterval::new(0.0, 50.0)]).unwrap();
        assert_eq!(segments, vec![Segment::blackout(0.0, 50.0)]);
    }

    #[test]
    fn test_plan_interval_at_start() {
        let segments = plan_timeline(20.0, &[BlackoutInterval::new(0.0, 5.0)]).unwrap();
        assert_eq!(
            segments,
            vec![Segment::blackout(0.0, 5.0), Segment::content(5.0, 20.0)]
        );
    }

    #[test]
    fn test_plan_interval_at_end() {
        let segments = plan_timeline(20.0, &[BlackoutInterval::new(15.0, 20.0)]).unwrap();
        assert_eq!(
            segments,
            vec![Segment::content(0.0, 15.0), Segment::blackout(15.0, 20.0)]
        );
    }

    #[test]
    fn test_plan_blackout_count_matches_intervals() {
        let intervals = [
            BlackoutInterval::new(5.0, 10.0),
            BlackoutInterval::new(20.0, 25.0),
            BlackoutInterval::new(40.0, 45.0),
        ];
        let segments = plan_timeline(60.0, &intervals).unwrap();
        assert_contiguous(&segments, 60.0);
        assert_eq!(segments.iter().filter(|s| s.blackout).count(), intervals.len());
    }

    #[test]
    fn test_plan_unsorted_overlapping_input_is_normalized() {
        // Unsorted, overlapping caller input must not yield negative-duration
        // or mis-ordered segments.
        let segments = plan_timeline(
            100.0,
            &[
                BlackoutInterval::new(60.0, 120.0),
                BlackoutInterval::new(10.0, 40.0),
                BlackoutInterval::new(30.0, 50.0),
            ],
        )
        .unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::content(0.0, 10.0),
                Segment::blackout(10.0, 50.0),
                Segment::content(50.0, 60.0),
                Segment::blackout(60.0, 100.0),
            ]
        );
        assert_contiguous(&segments, 100.0);
    }

    #[test]
    fn test_plan_rejects_nonpositive_duration() {
        assert!(plan_timeline(0.0, &[]).is_err());
        assert!(plan_timeline(-5.0, &[]).is_err());
    }
}
