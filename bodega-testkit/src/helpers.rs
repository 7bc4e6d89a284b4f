//! Test helper functions for catalog and stock seeding.

use std::sync::Arc;

use anyhow::Result;
use rust_decimal::Decimal;
use uuid::Uuid;

use bodega_checkout::{LockCoordinator, OrderProcessor, ProcessorConfig, StubCatalog};
use bodega_domain::{CartLine, OrderRequest, Price, Product, ProductId, Quantity, Sku};
use bodega_store::{Inventory, MemoryStore};

/// One catalog entry with its starting stock level.
pub struct StockEntry {
    /// SKU code (e.g., "COF-001")
    pub code: String,
    /// Display name
    pub name: String,
    /// Unit price
    pub price: Decimal,
    /// Starting stock in units
    pub units: u32,
}

impl StockEntry {
    /// Create a stock entry.
    pub fn new(code: &str, name: &str, price: Decimal, units: u32) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            price,
            units,
        }
    }
}

/// A fully wired in-memory checkout stack.
///
/// Holds the seeded products alongside the live components so tests can
/// look up ids and inspect stock after processing.
pub struct CheckoutStack {
    /// Products in seeding order
    pub products: Vec<Product>,
    /// Catalog serving those products
    pub catalog: Arc<StubCatalog>,
    /// Inventory seeded with the starting stock
    pub inventory: Arc<MemoryStore>,
    /// Processor wired over catalog, inventory, and a fresh coordinator
    pub processor: Arc<OrderProcessor<StubCatalog, MemoryStore>>,
}

impl CheckoutStack {
    /// Look up a seeded product id by SKU code.
    pub fn product_id(&self, code: &str) -> Option<ProductId> {
        self.products
            .iter()
            .find(|p| p.sku.as_str() == code)
            .map(|p| p.id)
    }
}

/// Build a product with a fresh id.
pub fn product(code: &str, name: &str, price: Decimal) -> Result<Product> {
    Ok(Product::new(Sku::new(code)?, name, Price::new(price)?))
}

/// Build an order request from (product id, units) pairs.
pub fn request(lines: &[(ProductId, u32)]) -> Result<OrderRequest> {
    let lines = lines
        .iter()
        .map(|(id, units)| Ok(CartLine::new(*id, Quantity::new(*units)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(OrderRequest::new(lines)?)
}

/// A product id that no catalog knows about.
pub fn unknown_product() -> ProductId {
    Uuid::now_v7()
}

/// Set stock levels on an inventory.
pub async fn seed_stock(inventory: &MemoryStore, levels: &[(ProductId, u32)]) -> Result<()> {
    for (product_id, units) in levels {
        inventory.set_stock(*product_id, *units).await?;
    }
    Ok(())
}

/// Seed a checkout stack with the default processor config.
pub async fn seed_checkout_stack(entries: Vec<StockEntry>) -> Result<CheckoutStack> {
    seed_checkout_stack_with(entries, ProcessorConfig::default()).await
}

/// Seed a checkout stack: catalog, stocked inventory, and processor.
pub async fn seed_checkout_stack_with(
    entries: Vec<StockEntry>,
    config: ProcessorConfig,
) -> Result<CheckoutStack> {
    let mut products = Vec::with_capacity(entries.len());
    let inventory = Arc::new(MemoryStore::new());

    for entry in &entries {
        let product = self::product(&entry.code, &entry.name, entry.price)?;
        inventory.set_stock(product.id, entry.units).await?;
        products.push(product);
    }

    let catalog = Arc::new(StubCatalog::with_products(products.clone()));
    let processor = Arc::new(OrderProcessor::new(
        Arc::clone(&catalog),
        Arc::clone(&inventory),
        Arc::new(LockCoordinator::new()),
        config,
    ));

    Ok(CheckoutStack {
        products,
        catalog,
        inventory,
        processor,
    })
}

// =============================================================================
// Tests
// =============================================================================
