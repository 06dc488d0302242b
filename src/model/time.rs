//! Time range and precomputed values supplied by the dashboard.

use serde::{Deserialize, Serialize};

use crate::nrql::Since;

const MS_PER_MINUTE: u64 = 60_000;

/// The dashboard time picker value.
///
/// A relative `duration` wins over absolute bounds, matching the platform
/// picker where both may be populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    #[serde(default)]
    pub begin_time: Option<i64>,
    #[serde(default)]
    pub end_time: Option<i64>,
    /// Window length in milliseconds.
    #[serde(default)]
    pub duration: Option<u64>,
}

impl TimeRange {
    /// Relative window of `minutes`, saturating at the largest representable
    /// duration.
    pub fn last_minutes(minutes: u64) -> Self {
        Self {
            duration: Some(minutes.saturating_mul(MS_PER_MINUTE)),
            ..Self::default()
        }
    }

    pub fn between(begin_time: i64, end_time: i64) -> Self {
        Self {
            begin_time: Some(begin_time),
            end_time: Some(end_time),
            duration: None,
        }
    }

    /// The SINCE clause for this range, if any.
    pub fn to_since(&self) -> Option<Since> {
        if let Some(duration) = self.duration {
            return Some(Since::MinutesAgo((duration / MS_PER_MINUTE).max(1)));
        }
        match (self.begin_time, self.end_time) {
            (Some(begin), Some(end)) => Some(Since::Between { begin, end }),
            _ => None,
        }
    }
}

/// Aggregate values computed by an earlier query and spliced into templates
/// through `{total_clusters}`, `{total_brokers}` and `{total_topics}`.
///
/// Unset values are zero. Averaging templates divide by their total, so
/// callers must supply it; the query builder logs a warning when a template
/// references a zero total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecomputedStatics {
    #[serde(default)]
    pub total_clusters: u64,
    #[serde(default)]
    pub total_brokers: u64,
    #[serde(default)]
    pub total_topics: u64,
}

impl PrecomputedStatics {
    /// Value for a `{total_*}` placeholder name.
    pub fn get(&self, name: &str) -> Option<u64> {
        match name {
            "total_clusters" => Some(self.total_clusters),
            "total_brokers" => Some(self.total_brokers),
            "total_topics" => Some(self.total_topics),
            _ => None,
        }
    }
}
