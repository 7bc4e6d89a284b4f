//! Error types for the simulation.

use bodega_domain::ProductId;
use thiserror::Error;

/// Errors from a simulation run.
///
/// The audit variants mean the pipeline broke an accounting rule, which
/// is exactly what the simulation exists to catch.
#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid simulation configuration
    #[error("Invalid simulation config: {0}")]
    Config(String),

    /// Failed to build the checkout stack
    #[error("Setup failed: {0}")]
    Setup(String),

    /// Domain error while generating requests
    #[error("Domain error: {0}")]
    Domain(#[from] bodega_domain::DomainError),

    /// Scheduler error while running batches
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] bodega_scheduler::SchedulerError),

    /// Store error while auditing stock
    #[error("Store error: {0}")]
    Store(#[from] bodega_store::StoreError),

    /// Units committed plus units left do not add up to units seeded
    #[error("Unit conservation broken: expected {expected}, accounted {actual}")]
    Conservation {
        /// Units seeded at the start
        expected: u64,
        /// Units on receipts plus units still on the shelf
        actual: u64,
    },

    /// A product ended above its seeded stock level
    #[error("Stock for {product_id} ended at {level}, above seeded {start}")]
    StockExceeded {
        /// Product whose level grew
        product_id: ProductId,
        /// Final level
        level: u32,
        /// Seeded level
        start: u32,
    },
}

/// Type alias for simulation results.
pub type SimResult<T> = Result<T, SimError>;
