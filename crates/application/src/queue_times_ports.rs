mod cache;
mod provider;

pub use cache::{QueueTimesCache, release_after};
pub use provider::QueueStatisticsProvider;
