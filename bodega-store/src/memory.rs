//! In-memory store implementation
//!
//! The production store for this core: stock lives in per-product atomic
//! counters so a reservation is one `fetch_update`, never a map-wide
//! critical section. The outer `RwLock` only guards map structure
//! (inserting new products); reservations take the shared read side.

use crate::error::StoreError;
use crate::repository::{Inventory, OrderRepository};
use async_trait::async_trait;
use bodega_domain::{OrderId, ProductId, Quantity, Receipt, RequestId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::RwLock;
use tracing::debug;

/// In-memory inventory and receipt store
pub struct MemoryStore {
    levels: RwLock<HashMap<ProductId, AtomicU32>>,
    receipts: RwLock<HashMap<OrderId, Receipt>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            levels: RwLock::new(HashMap::new()),
            receipts: RwLock::new(HashMap::new()),
        }
    }

    /// Number of products with a stock record
    pub fn product_count(&self) -> usize {
        self.levels.read().map(|levels| levels.len()).unwrap_or(0)
    }

    /// Number of saved receipts
    pub fn receipt_count(&self) -> usize {
        self.receipts.read().map(|receipts| receipts.len()).unwrap_or(0)
    }

    /// Clear all data (useful for test setup)
    pub fn clear(&self) {
        if let Ok(mut levels) = self.levels.write() {
            levels.clear();
        }
        if let Ok(mut receipts) = self.receipts.write() {
            receipts.clear();
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Inventory Implementation
// =============================================================================

#[async_trait]
impl Inventory for MemoryStore {
    async fn try_reserve(
        &self,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<bool, StoreError> {
        let levels = self
            .levels
            .read()
            .map_err(|e| StoreError::Lock(format!("Failed to acquire read lock: {}", e)))?;

        let units = quantity.as_u32();
        let reserved = match levels.get(&product_id) {
            Some(counter) => counter
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                    current.checked_sub(units)
                })
                .is_ok(),
            // No stock record means nothing to reserve
            None => false,
        };

        Ok(reserved)
    }

    async fn restore(&self, product_id: ProductId, quantity: Quantity) -> Result<(), StoreError> {
        let levels = self
            .levels
            .read()
            .map_err(|e| StoreError::Lock(format!("Failed to acquire read lock: {}", e)))?;

        match levels.get(&product_id) {
            Some(counter) => {
                counter.fetch_add(quantity.as_u32(), Ordering::SeqCst);
                Ok(())
            },
            None => Err(StoreError::not_found("stock", product_id.to_string())),
        }
    }

    async fn stock_of(&self, product_id: ProductId) -> Result<Option<u32>, StoreError> {
        let levels = self
            .levels
            .read()
            .map_err(|e| StoreError::Lock(format!("Failed to acquire read lock: {}", e)))?;

        Ok(levels.get(&product_id).map(|counter| counter.load(Ordering::SeqCst)))
    }

    async fn set_stock(&self, product_id: ProductId, units: u32) -> Result<(), StoreError> {
        let mut levels = self
            .levels
            .write()
            .map_err(|e| StoreError::Lock(format!("Failed to acquire write lock: {}", e)))?;

        levels.insert(product_id, AtomicU32::new(units));
        debug!(product_id = %product_id, units, "Stock level set");
        Ok(())
    }

    async fn levels(&self) -> Result<HashMap<ProductId, u32>, StoreError> {
        let levels = self
            .levels
            .read()
            .map_err(|e| StoreError::Lock(format!("Failed to acquire read lock: {}", e)))?;

        Ok(levels
            .iter()
            .map(|(id, counter)| (*id, counter.load(Ordering::SeqCst)))
            .collect())
    }
}

// =============================================================================
// Order Repository Implementation
// =============================================================================

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn save(&self, receipt: &Receipt) -> Result<(), StoreError> {
        let mut receipts = self
            .receipts
            .write()
            .map_err(|e| StoreError::Lock(format!("Failed to acquire write lock: {}", e)))?;

        if receipts.contains_key(&receipt.order_id) {
            return Err(StoreError::duplicate("order", receipt.order_id.to_string()));
        }

        receipts.insert(receipt.order_id, receipt.clone());
        debug!(order_id = %receipt.order_id, total = %receipt.total, "Receipt saved");
        Ok(())
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Receipt>, StoreError> {
        let receipts = self
            .receipts
            .read()
            .map_err(|e| StoreError::Lock(format!("Failed to acquire read lock: {}", e)))?;

        Ok(receipts.get(&id).cloned())
    }

    async fn find_by_request(&self, request_id: RequestId) -> Result<Option<Receipt>, StoreError> {
        let receipts = self
            .receipts
            .read()
            .map_err(|e| StoreError::Lock(format!("Failed to acquire read lock: {}", e)))?;

        Ok(receipts.values().find(|r| r.request_id == request_id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Receipt>, StoreError> {
        let receipts = self
            .receipts
            .read()
            .map_err(|e| StoreError::Lock(format!("Failed to acquire read lock: {}", e)))?;

        let mut all: Vec<Receipt> = receipts.values().cloned().collect();
        all.sort_by_key(|r| r.committed_at);
        Ok(all)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bodega_domain::{Price, Product, ReceiptLine, Sku};
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use uuid::Uuid;

    fn qty(value: u32) -> Quantity {
        Quantity::new(value).unwrap()
    }

    fn create_test_receipt() -> Receipt {
        let product = Product::new(
            Sku::new("COF-001").unwrap(),
            "House Blend Coffee",
            Price::new(dec!(12.50)).unwrap(),
        );
        Receipt::new(Uuid::now_v7(), vec![ReceiptLine::new(&product, qty(2))])
    }

    // Inventory tests
    #[tokio::test]
    async fn test_reserve_decrements_stock() {
        let store = MemoryStore::new();
        let product_id = Uuid::now_v7();
        store.set_stock(product_id, 10).await.unwrap();

        assert!(store.try_reserve(product_id, qty(4)).await.unwrap());
        assert_eq!(store.stock_of(product_id).await.unwrap(), Some(6));
    }

    #[tokio::test]
    async fn test_reserve_short_stock_leaves_count_untouched() {
        let store = MemoryStore::new();
        let product_id = Uuid::now_v7();
        store.set_stock(product_id, 6).await.unwrap();

        assert!(!store.try_reserve(product_id, qty(7)).await.unwrap());
        assert_eq!(store.stock_of(product_id).await.unwrap(), Some(6));
    }

    #[tokio::test]
    async fn test_reserve_exact_remaining_stock() {
        let store = MemoryStore::new();
        let product_id = Uuid::now_v7();
        store.set_stock(product_id, 5).await.unwrap();

        assert!(store.try_reserve(product_id, qty(5)).await.unwrap());
        assert_eq!(store.stock_of(product_id).await.unwrap(), Some(0));
        assert!(!store.try_reserve(product_id, qty(1)).await.unwrap());
    }

    #[tokio::test]
    async fn test_reserve_unknown_product_reports_no_stock() {
        let store = MemoryStore::new();
        assert!(!store.try_reserve(Uuid::now_v7(), qty(1)).await.unwrap());
    }

    #[tokio::test]
    async fn test_restore_returns_units() {
        let store = MemoryStore::new();
        let product_id = Uuid::now_v7();
        store.set_stock(product_id, 10).await.unwrap();

        assert!(store.try_reserve(product_id, qty(4)).await.unwrap());
        store.restore(product_id, qty(4)).await.unwrap();
        assert_eq!(store.stock_of(product_id).await.unwrap(), Some(10));
    }

    #[tokio::test]
    async fn test_restore_unknown_product_errors() {
        let store = MemoryStore::new();
        let result = store.restore(Uuid::now_v7(), qty(1)).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_restore_then_reserve_reaches_pre_reservation_state() {
        let store = MemoryStore::new();
        let product_id = Uuid::now_v7();
        store.set_stock(product_id, 8).await.unwrap();

        assert!(store.try_reserve(product_id, qty(3)).await.unwrap());
        store.restore(product_id, qty(3)).await.unwrap();

        // The full original stock is reservable again
        assert!(store.try_reserve(product_id, qty(8)).await.unwrap());
        assert_eq!(store.stock_of(product_id).await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn test_set_stock_overwrites() {
        let store = MemoryStore::new();
        let product_id = Uuid::now_v7();

        store.set_stock(product_id, 5).await.unwrap();
        store.set_stock(product_id, 12).await.unwrap();
        assert_eq!(store.stock_of(product_id).await.unwrap(), Some(12));
    }

    #[tokio::test]
    async fn test_stock_of_unknown_product() {
        let store = MemoryStore::new();
        assert_eq!(store.stock_of(Uuid::now_v7()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_levels_snapshot() {
        let store = MemoryStore::new();
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        store.set_stock(a, 3).await.unwrap();
        store.set_stock(b, 7).await.unwrap();

        let levels = store.levels().await.unwrap();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[&a], 3);
        assert_eq!(levels[&b], 7);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_reserves_never_oversell() {
        let store = Arc::new(MemoryStore::new());
        let product_id = Uuid::now_v7();
        store.set_stock(product_id, 10).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.try_reserve(product_id, qty(1)).await.unwrap()
            }));
        }

        let mut granted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                granted += 1;
            }
        }

        assert_eq!(granted, 10);
        assert_eq!(store.stock_of(product_id).await.unwrap(), Some(0));
    }

    // Order repository tests
    #[tokio::test]
    async fn test_receipt_save_and_find() {
        let store = MemoryStore::new();
        let receipt = create_test_receipt();
        let order_id = receipt.order_id;

        store.save(&receipt).await.unwrap();

        let found = store.find_by_id(order_id).await.unwrap();
        assert_eq!(found, Some(receipt));
    }

    #[tokio::test]
    async fn test_receipt_duplicate_rejected() {
        let store = MemoryStore::new();
        let receipt = create_test_receipt();

        store.save(&receipt).await.unwrap();
        let result = store.save(&receipt).await;
        assert!(matches!(result, Err(StoreError::Duplicate { .. })));
        assert_eq!(store.receipt_count(), 1);
    }

    #[tokio::test]
    async fn test_receipt_find_by_request() {
        let store = MemoryStore::new();
        let receipt = create_test_receipt();
        let request_id = receipt.request_id;

        store.save(&receipt).await.unwrap();

        let found = store.find_by_request(request_id).await.unwrap();
        assert_eq!(found.map(|r| r.order_id), Some(receipt.order_id));
        assert!(store.find_by_request(Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_sorted_by_commit_time() {
        let store = MemoryStore::new();
        let first = create_test_receipt();
        let second = create_test_receipt();

        store.save(&second).await.unwrap();
        store.save(&first).await.unwrap();

        let all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].committed_at <= all[1].committed_at);
    }

    #[tokio::test]
    async fn test_store_clear() {
        let store = MemoryStore::new();
        store.set_stock(Uuid::now_v7(), 5).await.unwrap();
        store.save(&create_test_receipt()).await.unwrap();

        assert_eq!(store.product_count(), 1);
        assert_eq!(store.receipt_count(), 1);

        store.clear();

        assert_eq!(store.product_count(), 0);
        assert_eq!(store.receipt_count(), 0);
    }
}
