//! Queue wait-time collector runtime.

#![forbid(unsafe_code)]

mod collector_config;

use std::sync::Arc;

use queuewait_application::{
    CollectionReport, QueueStatisticsProvider, QueueTimesCache, QueueTimesCollector,
};
use queuewait_core::{AppError, AppResult};
use queuewait_infrastructure::{RedisQueueTimesCache, TaskRouterStatisticsProvider};
use serde::Serialize;
use tracing::{info, warn};

use crate::collector_config::{CollectorConfig, init_tracing};

const COMPLETED_MESSAGE: &str = "Cache process completed.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectorInvocationResult {
    status_code: u16,
    body: CollectorInvocationBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectorInvocationBody {
    message: &'static str,
    success_count: u32,
    failure_count: u32,
}

impl From<CollectionReport> for CollectorInvocationResult {
    fn from(report: CollectionReport) -> Self {
        Self {
            status_code: 200,
            body: CollectorInvocationBody {
                message: COMPLETED_MESSAGE,
                success_count: report.success_count,
                failure_count: report.failure_count,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = CollectorConfig::load()?;
    let collector = build_collector(&config)?;

    info!(
        workspace_sid = %config.taskrouter.workspace_sid,
        taskrouter_base_url = %config.taskrouter.base_url,
        interval_seconds = ?config.interval_seconds,
        "queuewait-collector started"
    );

    let Some(interval) = config.interval() else {
        let report = collector.collect().await?;
        return publish_result(report);
    };

    loop {
        match collector.collect().await {
            Ok(report) => {
                if let Err(error) = publish_result(report) {
                    warn!(error = %error, "failed to publish collection result");
                }
            }
            Err(error) => {
                warn!(error = %error, "queue times collection failed");
            }
        }

        tokio::time::sleep(interval).await;
    }
}

fn build_collector(config: &CollectorConfig) -> AppResult<QueueTimesCollector> {
    let http_client = reqwest::Client::builder()
        .timeout(config.taskrouter_timeout())
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let provider: Arc<dyn QueueStatisticsProvider> = Arc::new(TaskRouterStatisticsProvider::new(
        http_client,
        config.taskrouter.clone(),
    ));

    let redis_client = redis::Client::open(config.redis_url.as_str())
        .map_err(|error| AppError::Validation(format!("invalid redis url: {error}")))?;
    let cache: Arc<dyn QueueTimesCache> = Arc::new(
        RedisQueueTimesCache::new(redis_client).with_ttl_seconds(config.queue_times_ttl_seconds),
    );

    Ok(QueueTimesCollector::new(provider, cache))
}

fn publish_result(report: CollectionReport) -> AppResult<()> {
    let result = CollectorInvocationResult::from(report);
    let encoded = serde_json::to_string(&result).map_err(|error| {
        AppError::Internal(format!("failed to serialize collection result: {error}"))
    })?;

    println!("{encoded}");
    Ok(())
}
