//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod queue_times;

pub use queue_times::{QUEUE_TIMES_CACHE_KEY, QueueTimesSnapshot, QueueWaitEntry};
