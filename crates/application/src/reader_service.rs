use std::sync::Arc;

use queuewait_core::AppResult;
use queuewait_domain::{QUEUE_TIMES_CACHE_KEY, QueueTimesSnapshot};
use tracing::{error, info, warn};

use crate::queue_times_ports::{QueueTimesCache, release_after};


/// Outcome of one wait-time lookup that is not an internal failure.
#[derive(Debug, Clone, PartialEq)]
pub enum QueueWaitTimeLookup {
    /// The queue is present in the latest snapshot.
    Found {
        /// Cached wait time in seconds.
        waittime: f64,
    },
    /// No queue identifier was supplied.
    MissingQueueSid,
    /// No snapshot has been cached yet.
    DataUnavailable,
    /// The snapshot exists but does not contain the queue.
    QueueNotFound {
        /// Identifier exactly as requested.
        queue_sid: String,
    },
}

impl QueueWaitTimeLookup {
    /// Returns the HTTP-style status code for this outcome.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Found { .. } => 200,
            Self::MissingQueueSid => 400,
            Self::DataUnavailable | Self::QueueNotFound { .. } => 404,
        }
    }

    /// Returns the user-facing error message, or `None` on success.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Found { .. } => None,
            Self::MissingQueueSid => Some("Missing queueSid parameter.".to_owned()),
            Self::DataUnavailable => Some("Wait time data not available.".to_owned()),
            Self::QueueNotFound { queue_sid } => {
                Some(format!("Wait time for queue {queue_sid} not found."))
            }
        }
    }
}

/// Application service answering single-queue lookups from the cached snapshot.
#[derive(Clone)]
pub struct QueueWaitTimeReader {
    cache: Arc<dyn QueueTimesCache>,
}

impl QueueWaitTimeReader {
    /// Creates a reader over the given cache.
    #[must_use]
    pub fn new(cache: Arc<dyn QueueTimesCache>) -> Self {
        Self { cache }
    }

    /// Looks up the cached wait time for one queue.
    ///
    /// A missing or empty identifier is answered without touching the cache.
    /// Any other identifier, whitespace included, is looked up verbatim.
    /// Otherwise the cache connection is released before returning. A cache
    /// read failure or an unparsable document is returned as an error so it
    /// stays distinguishable from the not-found outcomes.
    pub async fn lookup(&self, queue_sid: Option<&str>) -> AppResult<QueueWaitTimeLookup> {
        let Some(queue_sid) = queue_sid.filter(|value| !value.is_empty()) else {
            return Ok(QueueWaitTimeLookup::MissingQueueSid);
        };

        release_after(self.cache.as_ref(), self.lookup_cached(queue_sid))
            .await
            .inspect_err(|error| {
                error!(
                    queue_sid = %queue_sid,
                    error = %error,
                    "failed to retrieve queue wait time"
                );
            })
    }

    async fn lookup_cached(&self, queue_sid: &str) -> AppResult<QueueWaitTimeLookup> {
        let cached = self.cache.read(QUEUE_TIMES_CACHE_KEY).await?;
        let Some(document) = cached.filter(|document| !document.is_empty()) else {
            warn!("no queue times data found in cache");
            return Ok(QueueWaitTimeLookup::DataUnavailable);
        };

        let snapshot = QueueTimesSnapshot::from_json(document.as_str())?;
        match snapshot.get(queue_sid) {
            Some(entry) => {
                info!(
                    queue_sid = %queue_sid,
                    waittime = entry.waittime,
                    "retrieved queue wait time"
                );
                Ok(QueueWaitTimeLookup::Found {
                    waittime: entry.waittime,
                })
            }
            None => {
                warn!(queue_sid = %queue_sid, "wait time for queue not found in cached data");
                Ok(QueueWaitTimeLookup::QueueNotFound {
                    queue_sid: queue_sid.to_owned(),
                })
            }
        }
    }
}
