//! Lock store record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vredact_models::BlackoutInterval;

/// One stored blackout interval with its per-interval identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlackoutEntry {
    /// Stable identifier of this interval within the record.
    pub id: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

impl BlackoutEntry {
    /// Wrap a caller interval with a fresh identifier.
    pub fn from_interval(interval: &BlackoutInterval) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            start: interval.start,
            end: interval.end,
        }
    }

    pub fn as_interval(&self) -> BlackoutInterval {
        BlackoutInterval::new(self.start, self.end)
    }
}

/// A persisted lock record, owned by the external lock store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRecord {
    /// Record identifier assigned by the store.
    pub id: String,
    /// Platform reference.
    pub platform_id: String,
    /// User reference.
    pub user_id: String,
    /// Stable content identifier; the remote prefix derives from it.
    pub content_id: String,
    /// Locator of the published source asset; republish re-fetches it.
    pub original_locator: String,
    /// Locator of the current redacted playlist.
    pub redacted_locator: String,
    /// Current blackout intervals.
    #[serde(default)]
    pub blackout_intervals: Vec<BlackoutEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a new lock record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLockRecord {
    pub platform_id: String,
    pub user_id: String,
    pub content_id: String,
    pub original_locator: String,
    pub redacted_locator: String,
    pub blackout_intervals: Vec<BlackoutEntry>,
}

/// Payload for updating the redacted locator after a republish.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateRedactedLocator {
    pub redacted_locator: String,
    pub blackout_intervals: Vec<BlackoutEntry>,
}
