use async_trait::async_trait;
use queuewait_core::AppResult;

/// Port for the upstream task-routing statistics service.
#[async_trait]
pub trait QueueStatisticsProvider: Send + Sync {
    /// Lists every queue identifier in the configured workspace.
    async fn list_queue_sids(&self) -> AppResult<Vec<String>>;

    /// Fetches the average wait time in seconds for one queue.
    async fn fetch_wait_time(&self, queue_sid: &str) -> AppResult<f64>;
}
