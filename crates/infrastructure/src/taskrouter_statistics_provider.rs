//! TaskRouter REST adapter for queue statistics.

use std::collections::HashSet;

use async_trait::async_trait;
use queuewait_application::QueueStatisticsProvider;
use queuewait_core::{AppError, AppResult};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};


const TASK_QUEUE_PAGE_SIZE: u32 = 1000;

/// Connection settings for one TaskRouter workspace.
#[derive(Debug, Clone)]
pub struct TaskRouterConfig {
    /// API base URL without trailing slash.
    pub base_url: String,
    /// Account identifier used as the basic auth user.
    pub account_sid: String,
    /// Account auth token used as the basic auth password.
    pub auth_token: String,
    /// Workspace whose task queues are sampled.
    pub workspace_sid: String,
}

#[derive(Debug, Deserialize)]
struct TaskQueuePage {
    task_queues: Vec<TaskQueueResource>,
    #[serde(default)]
    meta: Option<PageMeta>,
}

#[derive(Debug, Deserialize)]
struct TaskQueueResource {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct PageMeta {
    next_page_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CumulativeStatisticsResource {
    wait_duration_in_queue_until_accepted: WaitDurationStatistics,
}

#[derive(Debug, Deserialize)]
struct WaitDurationStatistics {
    avg: f64,
}

/// HTTP implementation of the queue statistics port.
///
/// Each call is a single request; the `reqwest` client timeout bounds it.
pub struct TaskRouterStatisticsProvider {
    http_client: reqwest::Client,
    config: TaskRouterConfig,
}

impl TaskRouterStatisticsProvider {
    /// Creates a provider for one workspace.
    #[must_use]
    pub fn new(http_client: reqwest::Client, mut config: TaskRouterConfig) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_owned();
        Self {
            http_client,
            config,
        }
    }

    fn task_queues_url(&self) -> String {
        format!(
            "{}/v1/Workspaces/{}/TaskQueues?PageSize={TASK_QUEUE_PAGE_SIZE}",
            self.config.base_url, self.config.workspace_sid
        )
    }

    fn cumulative_statistics_url(&self, queue_sid: &str) -> String {
        format!(
            "{}/v1/Workspaces/{}/TaskQueues/{queue_sid}/CumulativeStatistics",
            self.config.base_url, self.config.workspace_sid
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, resource: &str) -> AppResult<T> {
        let response = self
            .http_client
            .get(url)
            .basic_auth(
                self.config.account_sid.as_str(),
                Some(self.config.auth_token.as_str()),
            )
            .send()
            .await
            .map_err(|error| AppError::Upstream(format!("failed to request {resource}: {error}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_owned());
            return Err(AppError::Upstream(format!(
                "{resource} request returned status {}: {body}",
                status.as_u16()
            )));
        }

        response.json::<T>().await.map_err(|error| {
            AppError::Upstream(format!("failed to parse {resource} response body: {error}"))
        })
    }
}

#[async_trait]
impl QueueStatisticsProvider for TaskRouterStatisticsProvider {
    async fn list_queue_sids(&self) -> AppResult<Vec<String>> {
        let mut queue_sids = Vec::new();
        let mut visited_urls = HashSet::new();
        let mut next_url = Some(self.task_queues_url());

        while let Some(url) = next_url {
            if !visited_urls.insert(url.clone()) {
                warn!(page_url = %url, "task queue pagination revisited a page, stopping");
                break;
            }

            let page: TaskQueuePage = self.get_json(url.as_str(), "task queue list").await?;
            debug!(page_size = page.task_queues.len(), "fetched task queue page");

            queue_sids.extend(page.task_queues.into_iter().map(|queue| queue.sid));
            next_url = page.meta.and_then(|meta| meta.next_page_url);
        }

        Ok(queue_sids)
    }

    async fn fetch_wait_time(&self, queue_sid: &str) -> AppResult<f64> {
        let url = self.cumulative_statistics_url(queue_sid);
        let statistics: CumulativeStatisticsResource = self
            .get_json(url.as_str(), "task queue cumulative statistics")
            .await?;

        Ok(statistics.wait_duration_in_queue_until_accepted.avg)
    }
}
