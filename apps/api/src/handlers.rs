pub mod health;
pub mod queue_wait_time;
