use queuewait_application::QueueWaitTimeReader;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub queue_wait_time_reader: QueueWaitTimeReader,
}
