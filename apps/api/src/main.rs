//! Queue wait-time lookup API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod state;

use std::sync::Arc;

use queuewait_application::{QueueTimesCache, QueueWaitTimeReader};
use queuewait_core::AppError;
use queuewait_infrastructure::RedisQueueTimesCache;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let redis_client = redis::Client::open(config.redis_url.as_str())
        .map_err(|error| AppError::Validation(format!("invalid redis url: {error}")))?;
    let cache: Arc<dyn QueueTimesCache> = Arc::new(RedisQueueTimesCache::new(redis_client));

    let app_state = AppState {
        queue_wait_time_reader: QueueWaitTimeReader::new(cache),
    };
    let app = api_router::build_router(app_state);

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "queuewait-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
