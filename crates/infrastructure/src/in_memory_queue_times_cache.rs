use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use queuewait_application::QueueTimesCache;
use queuewait_core::AppResult;
use tokio::sync::RwLock;

/// In-memory cache adapter for queue times, used for local runs and tests.
#[derive(Default)]
pub struct InMemoryQueueTimesCache {
    entries: RwLock<HashMap<String, String>>,
    releases: AtomicU32,
}

impl InMemoryQueueTimesCache {
    /// Creates an empty in-memory queue times cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many times the cache was released.
    #[must_use]
    pub fn release_count(&self) -> u32 {
        self.releases.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl QueueTimesCache for InMemoryQueueTimesCache {
    async fn write(&self, key: &str, value: String) -> AppResult<()> {
        self.entries.write().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn read(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn release(&self) -> AppResult<()> {
        self.releases.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
