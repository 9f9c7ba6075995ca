use std::sync::Arc;

use chrono::Utc;
use queuewait_core::{AppError, AppResult};
use queuewait_domain::{QUEUE_TIMES_CACHE_KEY, QueueTimesSnapshot, QueueWaitEntry};
use tracing::{error, info, warn};

use crate::queue_times_ports::{QueueStatisticsProvider, QueueTimesCache, release_after};


/// Counters describing one collection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionReport {
    /// Queues sampled and written into the snapshot.
    pub success_count: u32,
    /// Queues whose statistic fetch failed and were left out.
    pub failure_count: u32,
}

enum SampleOutcome {
    Success(QueueWaitEntry),
    Failure(AppError),
}

struct QueueSample {
    queue_sid: String,
    outcome: SampleOutcome,
}

/// Application service that samples every queue and publishes one snapshot.
#[derive(Clone)]
pub struct QueueTimesCollector {
    provider: Arc<dyn QueueStatisticsProvider>,
    cache: Arc<dyn QueueTimesCache>,
}

impl QueueTimesCollector {
    /// Creates a collector over the given provider and cache.
    #[must_use]
    pub fn new(provider: Arc<dyn QueueStatisticsProvider>, cache: Arc<dyn QueueTimesCache>) -> Self {
        Self { provider, cache }
    }

    /// Runs one collection pass and releases the cache connection afterwards.
    ///
    /// Per-queue failures are counted and skipped. A failed queue listing or a
    /// failed cache write is returned as an error. When no queue succeeds the
    /// previous snapshot is left in place.
    pub async fn collect(&self) -> AppResult<CollectionReport> {
        info!("starting queue times collection");
        release_after(self.cache.as_ref(), self.collect_and_publish()).await
    }

    async fn collect_and_publish(&self) -> AppResult<CollectionReport> {
        let queue_sids = self
            .provider
            .list_queue_sids()
            .await
            .inspect_err(|error| error!(error = %error, "failed to list queues"))?;
        info!(queue_count = queue_sids.len(), "found queues to process");

        let samples = self.sample_queues(queue_sids).await;
        let (snapshot, report) = aggregate_samples(samples);

        if report.success_count > 0 {
            let document = snapshot.to_json()?;
            self.cache.write(QUEUE_TIMES_CACHE_KEY, document).await?;
            info!(
                success_count = report.success_count,
                "cached queue wait times"
            );
        } else {
            warn!("no queue wait times were retrieved; previous snapshot left untouched");
        }

        if report.failure_count > 0 {
            error!(
                failure_count = report.failure_count,
                "failed to retrieve wait times for some queues"
            );
        }

        Ok(report)
    }

    async fn sample_queues(&self, queue_sids: Vec<String>) -> Vec<QueueSample> {
        let mut samples = Vec::with_capacity(queue_sids.len());

        for queue_sid in queue_sids {
            let outcome = match self.provider.fetch_wait_time(queue_sid.as_str()).await {
                Ok(waittime) => SampleOutcome::Success(QueueWaitEntry::new(waittime, Utc::now())),
                Err(error) => SampleOutcome::Failure(error),
            };
            samples.push(QueueSample { queue_sid, outcome });
        }

        samples
    }
}

fn aggregate_samples(samples: Vec<QueueSample>) -> (QueueTimesSnapshot, CollectionReport) {
    samples.into_iter().fold(
        (QueueTimesSnapshot::new(), CollectionReport::default()),
        |(mut snapshot, mut report), sample| {
            match sample.outcome {
                SampleOutcome::Success(entry) => {
                    snapshot.insert(sample.queue_sid, entry);
                    report.success_count = report.success_count.saturating_add(1);
                }
                SampleOutcome::Failure(error) => {
                    error!(
                        queue_sid = %sample.queue_sid,
                        error = %error,
                        "failed to retrieve wait time for queue"
                    );
                    report.failure_count = report.failure_count.saturating_add(1);
                }
            }

            (snapshot, report)
        },
    )
}
