use std::future::Future;

use async_trait::async_trait;
use queuewait_core::AppResult;
use tracing::{debug, warn};

/// Port for the shared cache holding the snapshot document.
#[async_trait]
pub trait QueueTimesCache: Send + Sync {
    /// Stores one serialized value, replacing any previous value.
    async fn write(&self, key: &str, value: String) -> AppResult<()>;

    /// Reads one serialized value if present.
    async fn read(&self, key: &str) -> AppResult<Option<String>>;

    /// Releases the underlying connection.
    ///
    /// Must be idempotent and safe to call when nothing was opened.
    async fn release(&self) -> AppResult<()>;
}

/// Awaits `work`, then releases the cache connection on every exit path.
///
/// Release failures are logged and never replace the outcome of `work`.
pub async fn release_after<T, F>(cache: &dyn QueueTimesCache, work: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    let outcome = work.await;

    match cache.release().await {
        Ok(()) => debug!("queue times cache connection released"),
        Err(error) => warn!(error = %error, "failed to release queue times cache connection"),
    }

    outcome
}
