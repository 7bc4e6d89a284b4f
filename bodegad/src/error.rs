//! Daemon error types.

use bodega_checkout::CheckoutError;
use bodega_domain::DomainError;
use bodega_scheduler::SchedulerError;
use bodega_store::StoreError;
use thiserror::Error;

/// Daemon-level errors.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Domain error
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Checkout error
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Scheduler error
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Final stock did not reconcile against seeded units and receipts
    #[error("Reconciliation failed: seeded {expected} units, accounted {actual}")]
    Reconciliation {
        /// Units seeded at startup
        expected: u64,
        /// Units on receipts plus units still in stock
        actual: u64,
    },
}

/// Result type for daemon operations.
pub type DaemonResult<T> = Result<T, DaemonError>;
