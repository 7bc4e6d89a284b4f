//! Port trait definitions for the storage layer
//!
//! These traits define the storage interface the checkout core consumes.
//! Implementations can be in-memory, database-backed, or mock for testing.

use crate::error::StoreError;
use async_trait::async_trait;
use bodega_domain::{OrderId, ProductId, Quantity, Receipt, RequestId};
use std::collections::HashMap;

/// Authoritative stock levels with atomic reservation
///
/// `try_reserve` is the single mutation point checkout uses; it must be
/// linearizable per product. Calls for different products must not
/// serialize against each other.
#[async_trait]
pub trait Inventory: Send + Sync {
    /// Atomically check and decrement stock for one product
    ///
    /// Returns `Ok(true)` and decrements when at least `quantity` units
    /// are in stock. Returns `Ok(false)` and leaves the count untouched
    /// when stock is short or the product has no stock record.
    async fn try_reserve(
        &self,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<bool, StoreError>;

    /// Return previously reserved units to stock (rollback support)
    ///
    /// Only ever called after a successful `try_reserve` for the same
    /// product and quantity, so an unknown product here is a caller bug
    /// and surfaces as `StoreError::NotFound`.
    async fn restore(&self, product_id: ProductId, quantity: Quantity) -> Result<(), StoreError>;

    /// Current stock level, `None` when the product has no stock record
    async fn stock_of(&self, product_id: ProductId) -> Result<Option<u32>, StoreError>;

    /// Set the absolute stock level (seeding and restock)
    async fn set_stock(&self, product_id: ProductId, units: u32) -> Result<(), StoreError>;

    /// Snapshot of all stock levels
    ///
    /// Per-product point-in-time reads; not a globally atomic snapshot.
    async fn levels(&self) -> Result<HashMap<ProductId, u32>, StoreError>;
}

/// Repository for committed receipts
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Save a committed receipt (insert only)
    ///
    /// # Errors
    /// Returns `StoreError::Duplicate` when the order id was already saved.
    async fn save(&self, receipt: &Receipt) -> Result<(), StoreError>;

    /// Find a receipt by order ID
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Receipt>, StoreError>;

    /// Find the receipt that settled a request, if any
    async fn find_by_request(&self, request_id: RequestId) -> Result<Option<Receipt>, StoreError>;

    /// All saved receipts, oldest commit first
    async fn find_all(&self) -> Result<Vec<Receipt>, StoreError>;
}
