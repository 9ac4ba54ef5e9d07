//! Blackout intervals and their normalization.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// A caller-supplied time range to be replaced by filler content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
pub struct BlackoutInterval {
    /// Start time in seconds.
    #[validate(range(min = 0.0))]
    pub start: f64,
    /// End time in seconds (exclusive).
    #[validate(range(min = 0.0))]
    pub end: f64,
}

impl BlackoutInterval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Caller-facing payload for a redaction request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, JsonSchema)]
pub struct RedactionRequest {
    /// Locator of the source asset (local path or blob store key).
    #[validate(length(min = 1))]
    pub source: String,
    /// Time ranges to black out, in seconds.
    #[validate(nested)]
    pub intervals: Vec<BlackoutInterval>,
}

/// Errors for interval validation and timeline planning.
#[derive(Debug, Error, PartialEq)]
pub enum IntervalError {
    #[error("source duration {0} is not positive")]
    BadDuration(f64),

    #[error("interval bounds are not finite: {start}..{end}")]
    NonFinite { start: f64, end: f64 },

    #[error("interval start {0} is negative")]
    NegativeStart(f64),

    #[error("interval {start}..{end} is empty or inverted")]
    Empty { start: f64, end: f64 },

    #[error("interval {start}..{end} starts at or past the source duration {duration}")]
    OutOfRange {
        start: f64,
        end: f64,
        duration: f64,
    },
}

/// Normalize caller intervals against the probed source duration.
///
/// Rejects intervals that cannot be repaired (non-finite bounds, negative
/// start, empty or inverted range, start at or past the end of the source),
/// clamps `end` to the duration, sorts by start and merges overlapping or
/// touching intervals. The result is sorted, disjoint and strictly inside
/// `[0, duration]`.
pub fn normalize_intervals(
    duration: f64,
    intervals: &[BlackoutInterval],
) -> Result<Vec<BlackoutInterval>, IntervalError> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(IntervalError::BadDuration(duration));
    }

    let mut clamped = Vec::with_capacity(intervals.len());
    for iv in intervals {
        if !iv.start.is_finite() || !iv.end.is_finite() {
            return Err(IntervalError::NonFinite {
                start: iv.start,
                end: iv.end,
            });
        }
        if iv.start < 0.0 {
            return Err(IntervalError::NegativeStart(iv.start));
        }
        if iv.start >= duration {
            return Err(IntervalError::OutOfRange {
                start: iv.start,
                end: iv.end,
                duration,
            });
        }
        let end = iv.end.min(duration);
        if iv.start >= end {
            return Err(IntervalError::Empty {
                start: iv.start,
                end: iv.end,
            });
        }
        clamped.push(BlackoutInterval::new(iv.start, end));
    }

    clamped.sort_by(|a, b| a.start.total_cmp(&b.start));

    // Merge overlapping or touching neighbours.
    let mut merged: Vec<BlackoutInterval> = Vec::with_capacity(clamped.len());
    for iv in clamped {
        match merged.last_mut() {
            Some(prev) if iv.start <= prev.end => {
                prev.end = prev.end.max(iv.end);
            }
            _ => merged.push(iv),
        }
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_passthrough_disjoint() {
        let out = normalize_intervals(
            100.0,
            &[
                BlackoutInterval::new(30.0, 45.0),
                BlackoutInterval::new(60.0, 70.0),
            ],
        )
        .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], BlackoutInterval::new(30.0, 45.0));
        assert_eq!(out[1], BlackoutInterval::new(60.0, 70.0));
    }

    #[test]
    fn test_normalize_sorts_and_merges() {
        let out = normalize_intervals(
            100.0,
            &[
                BlackoutInterval::new(50.0, 60.0),
                BlackoutInterval::new(10.0, 30.0),
                BlackoutInterval::new(25.0, 40.0),
            ],
        )
        .unwrap();
        assert_eq!(
            out,
            vec![
                BlackoutInterval::new(10.0, 40.0),
                BlackoutInterval::new(50.0, 60.0),
            ]
        );
    }

    #[test]
    fn test_normalize_merges_touching() {
        let out = normalize_intervals(
            50.0,
            &[
                BlackoutInterval::new(0.0, 10.0),
                BlackoutInterval::new(10.0, 20.0),
            ],
        )
        .unwrap();
        assert_eq!(out, vec![BlackoutInterval::new(0.0, 20.0)]);
    }

    #[test]
    fn test_normalize_clamps_end_to_duration() {
        let out = normalize_intervals(60.0, &[BlackoutInterval::new(50.0, 90.0)]).unwrap();
        assert_eq!(out, vec![BlackoutInterval::new(50.0, 60.0)]);
    }

    #[test]
    fn test_normalize_rejects_bad_input() {
        assert_eq!(
            normalize_intervals(0.0, &[]),
            Err(IntervalError::BadDuration(0.0))
        );
        assert_eq!(
            normalize_intervals(10.0, &[BlackoutInterval::new(-1.0, 5.0)]),
            Err(IntervalError::NegativeStart(-1.0))
        );
        assert_eq!(
            normalize_intervals(10.0, &[BlackoutInterval::new(5.0, 5.0)]),
            Err(IntervalError::Empty {
                start: 5.0,
                end: 5.0
            })
        );
        assert_eq!(
            normalize_intervals(10.0, &[BlackoutInterval::new(10.0, 12.0)]),
            Err(IntervalError::OutOfRange {
                start: 10.0,
                end: 12.0,
                duration: 10.0
            })
        );
        assert!(matches!(
            normalize_intervals(10.0, &[BlackoutInterval::new(f64::NAN, 5.0)]),
            Err(IntervalError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_normalize_empty_list() {
        assert_eq!(normalize_intervals(10.0, &[]), Ok(vec![]));
    }
}
