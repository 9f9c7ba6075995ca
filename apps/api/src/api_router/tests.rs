use std::sync::Arc;

use queuewait_application::{QueueTimesCache, QueueWaitTimeReader};
use queuewait_domain::QUEUE_TIMES_CACHE_KEY;
use queuewait_infrastructure::InMemoryQueueTimesCache;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::state::AppState;

use super::build_router;

const SNAPSHOT: &str =
    r#"{"queues":{"WQ1":{"waittime":42,"timestamp":"2023-01-01T00:00:00.000Z"}}}"#;

async fn spawn_api(cache: Arc<InMemoryQueueTimesCache>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|_| unreachable!());
    let address = listener.local_addr().unwrap_or_else(|_| unreachable!());

    let router = build_router(AppState {
        queue_wait_time_reader: QueueWaitTimeReader::new(cache),
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    format!("http://{address}")
}

async fn seeded_cache() -> Arc<InMemoryQueueTimesCache> {
    let cache = Arc::new(InMemoryQueueTimesCache::new());
    let written = cache
        .write(QUEUE_TIMES_CACHE_KEY, SNAPSHOT.to_owned())
        .await;
    assert!(written.is_ok());
    cache
}

async fn get(url: String) -> (u16, Value) {
    let response = reqwest::get(url).await.unwrap_or_else(|_| unreachable!());
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn queue_wait_time_route_returns_cached_wait_time() {
    let cache = seeded_cache().await;
    let base_url = spawn_api(cache.clone()).await;

    let (status, body) = get(format!("{base_url}/queue-wait-time?queueSid=WQ1")).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"waittime": 42.0}));
    assert_eq!(cache.release_count(), 1);
}

#[tokio::test]
async fn queue_wait_time_route_without_query_returns_bad_request() {
    let cache = seeded_cache().await;
    let base_url = spawn_api(cache.clone()).await;

    let (status, body) = get(format!("{base_url}/queue-wait-time")).await;

    assert_eq!(status, 400);
    assert_eq!(body, json!({"error": "Missing queueSid parameter."}));
    assert_eq!(cache.release_count(), 0);
}

#[tokio::test]
async fn queue_wait_time_route_with_empty_queue_sid_returns_bad_request() {
    let base_url = spawn_api(seeded_cache().await).await;

    let (status, body) = get(format!("{base_url}/queue-wait-time?queueSid=")).await;

    assert_eq!(status, 400);
    assert_eq!(body, json!({"error": "Missing queueSid parameter."}));
}

#[tokio::test]
async fn queue_wait_time_route_rejects_repeated_queue_sid_with_json_body() {
    let cache = seeded_cache().await;
    let base_url = spawn_api(cache.clone()).await;

    let (status, body) = get(format!(
        "{base_url}/queue-wait-time?queueSid=WQ1&queueSid=WQ2"
    ))
    .await;

    assert_eq!(status, 400);
    assert_eq!(body, json!({"error": "Missing queueSid parameter."}));
    assert_eq!(cache.release_count(), 0);
}

#[tokio::test]
async fn queue_wait_time_route_reports_unknown_queue() {
    let base_url = spawn_api(seeded_cache().await).await;

    let (status, body) = get(format!("{base_url}/queue-wait-time?queueSid=WQ2")).await;

    assert_eq!(status, 404);
    assert_eq!(body, json!({"error": "Wait time for queue WQ2 not found."}));
}

#[tokio::test]
async fn cross_origin_lookup_is_allowed() {
    let base_url = spawn_api(seeded_cache().await).await;

    let response = reqwest::Client::new()
        .get(format!("{base_url}/queue-wait-time?queueSid=WQ1"))
        .header("Origin", "https://flex.example.com")
        .send()
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn health_route_reports_ok() {
    let base_url = spawn_api(Arc::new(InMemoryQueueTimesCache::new())).await;

    let (status, body) = get(format!("{base_url}/health")).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"status": "ok"}));
}
