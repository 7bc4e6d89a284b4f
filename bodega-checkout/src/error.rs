//! Checkout layer error types.
//!
//! These cover infrastructure faults only. Business outcomes (unknown
//! product, short stock, lock timeout) are values inside `OrderResult`,
//! not errors.

use bodega_domain::ProductId;
use thiserror::Error;

/// Errors that can occur during checkout operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Catalog communication error
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Lock coordinator error
    #[error("Lock coordinator error: {0}")]
    LockCoordinator(String),

    /// Rollback could not complete (critical consistency violation)
    ///
    /// Reserved units may not have been returned to stock. Stock state
    /// for this product must be treated as suspect until reconciled.
    #[error("Rollback failed: could not return {units} units of {product_id}")]
    RollbackFailed {
        /// Product whose units were not returned
        product_id: ProductId,
        /// Units that were reserved but not restored
        units: u32,
        /// Underlying store fault
        #[source]
        source: bodega_store::StoreError,
    },

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] bodega_store::StoreError),

    /// Domain error
    #[error("Domain error: {0}")]
    Domain(#[from] bodega_domain::DomainError),
}

/// Result type for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;
