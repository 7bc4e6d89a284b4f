//! Stub catalog implementation.
//!
//! Simulates catalog behavior without a product service. Used by tests,
//! the stress simulation, and the demo runtime.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use bodega_domain::{Price, Product, ProductId};

use crate::error::CheckoutError;
use crate::ports::CatalogPort;

// =============================================================================
// Stub Catalog
// =============================================================================

/// In-memory catalog.
///
/// The product list is fixed at construction; catalog entries are
/// reference data here, only stock levels change during checkout.
pub struct StubCatalog {
    /// Products by id
    products: HashMap<ProductId, Product>,
    /// Whether to simulate a failure on the next call
    fail_next: AtomicBool,
}

impl StubCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            products: HashMap::new(),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Create a catalog holding the given products.
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id, p)).collect(),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Number of listed products.
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Configure the next call to fail.
    pub fn set_fail_next(&self, fail: bool) {
        self.fail_next.store(fail, Ordering::SeqCst);
    }

    /// Check if we should fail the next operation (resets after check).
    fn should_fail(&self) -> bool {
        self.fail_next.swap(false, Ordering::SeqCst)
    }
}

impl Default for StubCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogPort for StubCatalog {
    async fn lookup(&self, product_id: ProductId) -> Result<Option<Product>, CheckoutError> {
        if self.should_fail() {
            return Err(CheckoutError::Catalog("Simulated catalog failure".to_string()));
        }

        Ok(self.products.get(&product_id).cloned())
    }

    async fn unit_price(&self, product_id: ProductId) -> Result<Option<Price>, CheckoutError> {
        if self.should_fail() {
            return Err(CheckoutError::Catalog("Simulated catalog failure".to_string()));
        }

        Ok(self.products.get(&product_id).map(|p| p.unit_price))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bodega_domain::Sku;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn create_test_product(code: &str) -> Product {
        Product::new(
            Sku::new(code).unwrap(),
            format!("Product {}", code),
            Price::new(dec!(9.99)).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_lookup_listed_product() {
        let product = create_test_product("COF-001");
        let product_id = product.id;
        let catalog = StubCatalog::with_products(vec![product]);

        let found = catalog.lookup(product_id).await.unwrap();
        assert_eq!(found.map(|p| p.id), Some(product_id));
    }

    #[tokio::test]
    async fn test_lookup_unknown_product() {
        let catalog = StubCatalog::with_products(vec![create_test_product("COF-001")]);
        assert!(catalog.lookup(Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unit_price() {
        let product = create_test_product("TEA-001");
        let product_id = product.id;
        let catalog = StubCatalog::with_products(vec![product]);

        let price = catalog.unit_price(product_id).await.unwrap();
        assert_eq!(price.map(|p| p.as_decimal()), Some(dec!(9.99)));
        assert!(catalog.unit_price(Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_simulated_failure_resets() {
        let product = create_test_product("COF-001");
        let product_id = product.id;
        let catalog = StubCatalog::with_products(vec![product]);

        catalog.set_fail_next(true);
        assert!(catalog.lookup(product_id).await.is_err());

        // Next call should succeed
        assert!(catalog.lookup(product_id).await.is_ok());
    }
}
