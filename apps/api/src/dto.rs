use serde::{Deserialize, Serialize};

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Query parameters for a single-queue wait-time lookup.
#[derive(Debug, Default, Deserialize)]
pub struct QueueWaitTimeQuery {
    #[serde(rename = "queueSid")]
    pub queue_sid: Option<String>,
}

/// Cached wait time for one queue.
#[derive(Debug, Serialize)]
pub struct QueueWaitTimeResponse {
    pub waittime: f64,
}
