//! Checkout layer port definitions.
//!
//! Ports define the interfaces checkout consumes from the rest of the
//! system. Adapters implement them for specific backends (in-memory
//! stub, a product service, etc.).

use async_trait::async_trait;

use bodega_domain::{Price, Product, ProductId};

use crate::error::CheckoutError;

// =============================================================================
// Catalog Port
// =============================================================================

/// Port for catalog reads.
///
/// Checkout resolves every product through this port before touching
/// stock, and captures unit prices for the receipt from the resolved
/// products. The catalog is read-mostly; price changes concurrent with
/// checkout are legal and simply land on whichever commit reads them.
///
/// Implementations:
/// - `StubCatalog` - In-memory catalog for tests and the demo runtime
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// Resolve a product by id.
    ///
    /// # Arguments
    ///
    /// * `product_id` - Catalog identity to resolve
    ///
    /// # Returns
    ///
    /// `Ok(Some(product))` when listed, `Ok(None)` for an unknown id.
    /// `Err` only for infrastructure faults.
    async fn lookup(&self, product_id: ProductId) -> Result<Option<Product>, CheckoutError>;

    /// Current unit price for a product.
    ///
    /// # Arguments
    ///
    /// * `product_id` - Catalog identity to price
    ///
    /// # Returns
    ///
    /// `Ok(Some(price))` when listed, `Ok(None)` for an unknown id.
    async fn unit_price(&self, product_id: ProductId) -> Result<Option<Price>, CheckoutError>;
}
