use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use queuewait_application::{
    QueueStatisticsProvider, QueueTimesCache, QueueTimesCollector, QueueWaitTimeReader,
};
use queuewait_core::{AppError, AppResult};
use queuewait_domain::QUEUE_TIMES_CACHE_KEY;
use queuewait_infrastructure::InMemoryQueueTimesCache;

use crate::dto::QueueWaitTimeQuery;
use crate::state::AppState;

use super::queue_wait_time_handler;

struct FixedStatisticsProvider {
    wait_times: Vec<(&'static str, Option<f64>)>,
}

#[async_trait]
impl QueueStatisticsProvider for FixedStatisticsProvider {
    async fn list_queue_sids(&self) -> AppResult<Vec<String>> {
        Ok(self
            .wait_times
            .iter()
            .map(|(queue_sid, _)| (*queue_sid).to_owned())
            .collect())
    }

    async fn fetch_wait_time(&self, queue_sid: &str) -> AppResult<f64> {
        self.wait_times
            .iter()
            .find(|(candidate, _)| *candidate == queue_sid)
            .and_then(|(_, wait_time)| *wait_time)
            .ok_or_else(|| AppError::Upstream(format!("no statistics for '{queue_sid}'")))
    }
}

fn app_state(cache: Arc<InMemoryQueueTimesCache>) -> AppState {
    AppState {
        queue_wait_time_reader: QueueWaitTimeReader::new(cache),
    }
}

async fn request(cache: Arc<InMemoryQueueTimesCache>, queue_sid: Option<&str>) -> Response {
    let uri = match queue_sid {
        Some(queue_sid) => format!("/queue-wait-time?queueSid={queue_sid}"),
        None => "/queue-wait-time".to_owned(),
    };
    request_uri(cache, uri.as_str()).await
}

async fn request_uri(cache: Arc<InMemoryQueueTimesCache>, uri: &str) -> Response {
    let uri = uri.parse::<Uri>().unwrap_or_else(|_| unreachable!());
    queue_wait_time_handler(
        State(app_state(cache)),
        Query::<QueueWaitTimeQuery>::try_from_uri(&uri),
    )
    .await
    .into_response()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

async fn seeded_cache(document: &str) -> Arc<InMemoryQueueTimesCache> {
    let cache = Arc::new(InMemoryQueueTimesCache::new());
    let written = cache
        .write(QUEUE_TIMES_CACHE_KEY, document.to_owned())
        .await;
    assert!(written.is_ok());
    cache
}

#[tokio::test]
async fn cached_queue_returns_wait_time_only() {
    let cache = seeded_cache(
        r#"{"queues":{"WQ1":{"waittime":42,"timestamp":"2023-01-01T00:00:00.000Z"}}}"#,
    )
    .await;

    let response = request(cache.clone(), Some("WQ1")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"waittime": 42.0}));
    assert_eq!(cache.release_count(), 1);
}

#[tokio::test]
async fn unknown_queue_returns_not_found_naming_the_queue() {
    let cache = seeded_cache(
        r#"{"queues":{"WQ1":{"waittime":42,"timestamp":"2023-01-01T00:00:00.000Z"}}}"#,
    )
    .await;

    let response = request(cache, Some("WQ2")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Wait time for queue WQ2 not found."})
    );
}

#[tokio::test]
async fn empty_cache_returns_data_unavailable() {
    let cache = Arc::new(InMemoryQueueTimesCache::new());

    let response = request(cache.clone(), Some("WQ1")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Wait time data not available."})
    );
    assert_eq!(cache.release_count(), 1);
}

#[tokio::test]
async fn corrupt_snapshot_returns_internal_server_error() {
    let cache = seeded_cache("invalid-json").await;

    let response = request(cache.clone(), Some("WQ1")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Internal Server Error"})
    );
    assert_eq!(cache.release_count(), 1);
}

#[tokio::test]
async fn missing_queue_sid_returns_bad_request_without_cache_access() {
    let cache = seeded_cache(r#"{"queues":{}}"#).await;

    let response = request(cache.clone(), None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Missing queueSid parameter."})
    );
    assert_eq!(cache.release_count(), 0);
}

#[tokio::test]
async fn collected_snapshot_is_served_by_lookup() {
    let cache = Arc::new(InMemoryQueueTimesCache::new());
    let collector = QueueTimesCollector::new(
        Arc::new(FixedStatisticsProvider {
            wait_times: vec![("WQ001", Some(95.5)), ("WQ002", None)],
        }),
        cache.clone(),
    );

    let report = collector.collect().await.unwrap_or_default();
    assert_eq!(report.success_count, 1);
    assert_eq!(report.failure_count, 1);

    let found = request(cache.clone(), Some("WQ001")).await;
    assert_eq!(found.status(), StatusCode::OK);
    assert_eq!(json_body(found).await, json!({"waittime": 95.5}));

    let failed = request(cache, Some("WQ002")).await;
    assert_eq!(failed.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(failed).await,
        json!({"error": "Wait time for queue WQ002 not found."})
    );
}

#[tokio::test]
async fn repeated_queue_sid_returns_json_bad_request_without_cache_access() {
    let cache = seeded_cache(r#"{"queues":{}}"#).await;

    let response = request_uri(cache.clone(), "/queue-wait-time?queueSid=WQ1&queueSid=WQ2").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Missing queueSid parameter."})
    );
    assert_eq!(cache.release_count(), 0);
}

#[tokio::test]
async fn encoded_whitespace_queue_sid_is_looked_up() {
    let cache = seeded_cache(
        r#"{"queues":{"WQ1":{"waittime":42,"timestamp":"2023-01-01T00:00:00.000Z"}}}"#,
    )
    .await;

    let response = request_uri(cache.clone(), "/queue-wait-time?queueSid=%20%20").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Wait time for queue    not found."})
    );
    assert_eq!(cache.release_count(), 1);
}
