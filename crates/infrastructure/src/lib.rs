//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_queue_times_cache;
mod redis_queue_times_cache;
mod taskrouter_statistics_provider;

pub use in_memory_queue_times_cache::InMemoryQueueTimesCache;
pub use redis_queue_times_cache::{RedisQueueTimesCache, redis_connection_url};
pub use taskrouter_statistics_provider::{TaskRouterConfig, TaskRouterStatisticsProvider};
