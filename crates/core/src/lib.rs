//! Shared primitives for all Rust crates in the queue wait-time workspace.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Result type used across queuewait crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input, configuration or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// The upstream statistics provider failed or answered unexpectedly.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Internal unexpected error, including cache and serialization failures.
    #[error("internal error: {0}")]
    Internal(String),
}
