//! Order processor: validate, lock, reserve, commit.
//!
//! The processor is the bridge between the catalog (reads) and the
//! inventory (the only shared mutable state). Every order follows the
//! same path, and stock is only ever mutated inside the lock set's
//! critical section.
//!
//! # Flow
//!
//! ```text
//! OrderRequest → Catalog (validate) → Lock Coordinator (sorted acquire)
//!              → Inventory (reserve per line, rollback on failure)
//!              → Receipt | Rejection
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use bodega_domain::{
    CartLine, OrderRequest, OrderResult, Product, ProductId, Receipt, ReceiptLine, RejectReason,
    Rejection, RequestId,
};
use bodega_store::Inventory;

use crate::error::{CheckoutError, CheckoutResult};
use crate::locks::{LockAttempt, LockCoordinator};
use crate::ports::CatalogPort;

// =============================================================================
// Processor Config
// =============================================================================

/// Checkout tuning.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Bound on assembling one order's lock set
    pub lock_timeout: Duration,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_millis(500),
        }
    }
}

// =============================================================================
// Order Processor
// =============================================================================

/// Processes order requests against shared stock.
///
/// The processor:
/// 1. Resolves every product through the catalog (prices captured here)
/// 2. Acquires the per-product lock set in ascending id order
/// 3. Reserves stock line by line, rolling back everything on the first failure
/// 4. Builds the receipt for fully reserved requests
///
/// Rejections are values in the returned [`OrderResult`]; `Err` means an
/// infrastructure fault, and even then reservations made for the failed
/// request have been rolled back.
pub struct OrderProcessor<C: CatalogPort, I: Inventory> {
    /// Catalog port for product resolution and commit-time prices
    catalog: Arc<C>,
    /// Authoritative stock levels
    inventory: Arc<I>,
    /// Per-product mutual exclusion
    locks: Arc<LockCoordinator>,
    /// Tuning
    config: ProcessorConfig,
}

impl<C: CatalogPort, I: Inventory> OrderProcessor<C, I> {
    /// Create a new processor.
    pub fn new(
        catalog: Arc<C>,
        inventory: Arc<I>,
        locks: Arc<LockCoordinator>,
        config: ProcessorConfig,
    ) -> Self {
        Self { catalog, inventory, locks, config }
    }

    /// Process one order request to its definitive outcome.
    ///
    /// On any rejection the stock of every referenced product equals its
    /// value from before the call.
    pub async fn process(&self, request: &OrderRequest) -> CheckoutResult<OrderResult> {
        debug!(request_id = %request.id, lines = request.lines.len(), "Processing order request");

        // 1. Resolve every product before touching locks or stock
        let mut products: HashMap<ProductId, Product> = HashMap::new();
        for line in &request.lines {
            if products.contains_key(&line.product_id) {
                continue;
            }
            match self.catalog.lookup(line.product_id).await? {
                Some(product) => {
                    products.insert(line.product_id, product);
                },
                None => {
                    info!(
                        request_id = %request.id,
                        product_id = %line.product_id,
                        "Order rejected: unknown product"
                    );
                    return Ok(OrderResult::Rejected(Rejection::new(
                        request.id,
                        RejectReason::InvalidProduct { product_id: line.product_id },
                    )));
                },
            }
        }

        // 2. Pre-build receipt lines so nothing fallible runs after commit
        let mut receipt_lines = Vec::with_capacity(request.lines.len());
        for line in &request.lines {
            let product = products.get(&line.product_id).ok_or_else(|| {
                CheckoutError::Catalog(format!("Unresolved product {}", line.product_id))
            })?;
            receipt_lines.push(ReceiptLine::new(product, line.quantity));
        }

        // 3. Assemble the lock set (ascending product id order)
        let distinct = request.distinct_products();
        let lock_set =
            match self.locks.acquire_all(&distinct, self.config.lock_timeout).await? {
                LockAttempt::Acquired(set) => set,
                LockAttempt::TimedOut => {
                    warn!(
                        request_id = %request.id,
                        products = distinct.len(),
                        timeout_ms = self.config.lock_timeout.as_millis() as u64,
                        "Order rejected: lock set timed out"
                    );
                    return Ok(OrderResult::Rejected(Rejection::new(
                        request.id,
                        RejectReason::LockTimeout,
                    )));
                },
            };
        debug!(request_id = %request.id, locks = lock_set.len(), "Lock set held");

        // 4. Reserve line by line; the first failure rolls back the rest
        let mut reserved: Vec<CartLine> = Vec::with_capacity(request.lines.len());
        for line in &request.lines {
            match self.inventory.try_reserve(line.product_id, line.quantity).await {
                Ok(true) => reserved.push(*line),
                Ok(false) => {
                    // Availability at the failed attempt, read while the
                    // lock set is still held
                    let available = match self.inventory.stock_of(line.product_id).await {
                        Ok(level) => level.unwrap_or(0),
                        Err(e) => {
                            error!(
                                request_id = %request.id,
                                product_id = %line.product_id,
                                error = %e,
                                "Stock read failed, rolling back"
                            );
                            self.rollback(request.id, &reserved).await?;
                            return Err(e.into());
                        },
                    };
                    self.rollback(request.id, &reserved).await?;
                    info!(
                        request_id = %request.id,
                        product_id = %line.product_id,
                        requested = line.quantity.as_u32(),
                        available,
                        "Order rejected: insufficient stock"
                    );
                    return Ok(OrderResult::Rejected(Rejection::new(
                        request.id,
                        RejectReason::InsufficientStock {
                            product_id: line.product_id,
                            requested: line.quantity.as_u32(),
                            available,
                        },
                    )));
                },
                Err(e) => {
                    error!(
                        request_id = %request.id,
                        product_id = %line.product_id,
                        error = %e,
                        "Reservation failed, rolling back"
                    );
                    self.rollback(request.id, &reserved).await?;
                    return Err(e.into());
                },
            }
        }

        // 5. Stock is committed; release locks before assembling the receipt
        drop(lock_set);

        let receipt = Receipt::new(request.id, receipt_lines);
        info!(
            request_id = %request.id,
            order_id = %receipt.order_id,
            lines = receipt.lines.len(),
            total = %receipt.total,
            "Order committed"
        );

        Ok(OrderResult::Committed(receipt))
    }

    /// Return every reserved line to stock, most recent first.
    ///
    /// Runs while the lock set is still held, so a rolled-back request
    /// is invisible to competing orders for the same products.
    async fn rollback(&self, request_id: RequestId, reserved: &[CartLine]) -> CheckoutResult<()> {
        for line in reserved.iter().rev() {
            if let Err(e) = self.inventory.restore(line.product_id, line.quantity).await {
                return Err(CheckoutError::RollbackFailed {
                    product_id: line.product_id,
                    units: line.quantity.as_u32(),
                    source: e,
                });
            }
        }
        if !reserved.is_empty() {
            debug!(request_id = %request_id, lines = reserved.len(), "Rolled back reservations");
        }
        Ok(())
    }

    /// Get the lock coordinator (for inspection).
    pub fn locks(&self) -> &LockCoordinator {
        &self.locks
    }

    /// Get the inventory (for stock reads).
    pub fn inventory(&self) -> &I {
        &self.inventory
    }
}

// =============================================================================
// Tests
// =============================================================================
