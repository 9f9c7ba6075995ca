//! Application services and ports.

#![forbid(unsafe_code)]

mod collector_service;
mod queue_times_ports;
mod reader_service;

pub use collector_service::{CollectionReport, QueueTimesCollector};
pub use queue_times_ports::{QueueStatisticsProvider, QueueTimesCache, release_after};
pub use reader_service::{QueueWaitTimeLookup, QueueWaitTimeReader};
