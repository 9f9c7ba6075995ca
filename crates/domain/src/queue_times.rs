//! Queue wait-time snapshot document and its JSON codec.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use queuewait_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Cache key holding the serialized snapshot document.
pub const QUEUE_TIMES_CACHE_KEY: &str = "queue-times";

/// Latest wait-time sample for one queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueWaitEntry {
    /// Average wait in seconds, as reported upstream.
    pub waittime: f64,
    /// Collection time, ISO-8601 with millisecond precision.
    pub timestamp: String,
}

impl QueueWaitEntry {
    /// Creates an entry for a sample taken at `collected_at`.
    ///
    /// The wait time is stored exactly as given; no rounding or clamping.
    #[must_use]
    pub fn new(waittime: f64, collected_at: DateTime<Utc>) -> Self {
        Self {
            waittime,
            timestamp: collected_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Consolidated snapshot of every queue sampled successfully in one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueTimesSnapshot {
    queues: BTreeMap<String, QueueWaitEntry>,
}

impl QueueTimesSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the entry for one queue, replacing any earlier entry.
    pub fn insert(&mut self, queue_sid: impl Into<String>, entry: QueueWaitEntry) {
        self.queues.insert(queue_sid.into(), entry);
    }

    /// Returns the entry for one queue.
    #[must_use]
    pub fn get(&self, queue_sid: &str) -> Option<&QueueWaitEntry> {
        self.queues.get(queue_sid)
    }

    /// Returns the number of queues in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    /// Returns whether the snapshot has no queues.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    /// Iterates queue identifiers in sorted order.
    pub fn queue_sids(&self) -> impl Iterator<Item = &str> {
        self.queues.keys().map(String::as_str)
    }

    /// Serializes the snapshot into its cached JSON form.
    pub fn to_json(&self) -> AppResult<String> {
        serde_json::to_string(self).map_err(|error| {
            AppError::Internal(format!("failed to serialize queue times snapshot: {error}"))
        })
    }

    /// Parses a cached JSON document.
    pub fn from_json(value: &str) -> AppResult<Self> {
        serde_json::from_str(value).map_err(|error| {
            AppError::Internal(format!("invalid queue times snapshot document: {error}"))
        })
    }
}
