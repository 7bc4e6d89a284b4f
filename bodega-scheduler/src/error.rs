//! Error types for the batch scheduler.

use thiserror::Error;

/// Errors that can occur while running a batch.
///
/// Business rejections never show up here; they are values inside the
/// returned results. An error from the scheduler means some part of the
/// machinery failed, after every worker in the batch was still drained.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A worker hit an infrastructure fault during checkout
    #[error("Checkout error: {0}")]
    Checkout(#[from] bodega_checkout::CheckoutError),

    /// The worker pool rejected a permit request
    #[error("Worker pool error: {0}")]
    Pool(String),

    /// A worker task panicked or was cancelled before finishing
    #[error("Worker failed: {0}")]
    Worker(String),
}

/// Type alias for scheduler results.
pub type SchedulerResult<T> = Result<T, SchedulerError>;
