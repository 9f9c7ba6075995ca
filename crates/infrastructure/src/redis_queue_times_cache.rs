//! Redis-backed queue times cache.

use async_trait::async_trait;
use queuewait_application::QueueTimesCache;
use queuewait_core::{AppError, AppResult};
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use tokio::sync::Mutex;
use tracing::debug;

/// Redis implementation of the queue times cache port.
///
/// One multiplexed connection is opened on first use and kept until
/// [`QueueTimesCache::release`] drops it. The next call reconnects.
pub struct RedisQueueTimesCache {
    client: redis::Client,
    connection: Mutex<Option<MultiplexedConnection>>,
    ttl_seconds: Option<u64>,
}

impl RedisQueueTimesCache {
    /// Creates a cache adapter with a configured Redis client.
    #[must_use]
    pub fn new(client: redis::Client) -> Self {
        Self {
            client,
            connection: Mutex::new(None),
            ttl_seconds: None,
        }
    }

    /// Expires written values after `ttl_seconds`. Zero keeps values forever.
    #[must_use]
    pub fn with_ttl_seconds(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = (ttl_seconds > 0).then_some(ttl_seconds);
        self
    }

    async fn connection(&self) -> AppResult<MultiplexedConnection> {
        let mut connection = self.connection.lock().await;
        if let Some(existing) = connection.as_ref() {
            return Ok(existing.clone());
        }

        let opened = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))?;
        *connection = Some(opened.clone());
        debug!("opened redis connection for queue times cache");

        Ok(opened)
    }
}

#[async_trait]
impl QueueTimesCache for RedisQueueTimesCache {
    async fn write(&self, key: &str, value: String) -> AppResult<()> {
        let mut connection = self.connection().await?;

        let written = match self.ttl_seconds {
            Some(ttl_seconds) => connection.set_ex::<_, _, ()>(key, value, ttl_seconds).await,
            None => connection.set::<_, _, ()>(key, value).await,
        };

        written.map_err(|error| {
            AppError::Internal(format!(
                "failed to write queue times cache entry '{key}': {error}"
            ))
        })
    }

    async fn read(&self, key: &str) -> AppResult<Option<String>> {
        let mut connection = self.connection().await?;

        connection
            .get::<_, Option<String>>(key)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to read queue times cache entry '{key}': {error}"
                ))
            })
    }

    async fn release(&self) -> AppResult<()> {
        if self.connection.lock().await.take().is_some() {
            debug!("closed redis connection for queue times cache");
        }

        Ok(())
    }
}

/// Builds a Redis URL from discrete host, port and password settings.
#[must_use]
pub fn redis_connection_url(host: &str, port: u16, password: Option<&str>) -> String {
    match password.filter(|value| !value.is_empty()) {
        Some(password) => format!("redis://default:{password}@{host}:{port}"),
        None => format!("redis://{host}:{port}"),
    }
}
