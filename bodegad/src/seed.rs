//! Demo seed data.
//!
//! A small fixed catalog with deliberately tight stock levels, so a demo
//! batch of overlapping orders produces both commits and rejections.

use bodega_domain::{DomainError, Price, Product, Sku};
use rust_decimal_macros::dec;

/// One seeded product and its starting stock.
#[derive(Debug, Clone)]
pub struct SeedProduct {
    /// The catalog entry
    pub product: Product,
    /// Units on the shelf at startup
    pub units: u32,
}

impl SeedProduct {
    fn new(code: &str, name: &str, price: rust_decimal::Decimal, units: u32) -> Result<Self, DomainError> {
        Ok(Self {
            product: Product::new(Sku::new(code)?, name, Price::new(price)?),
            units,
        })
    }
}

/// Build the demo catalog.
///
/// Ids are fresh on every call; codes, prices, and stock are fixed.
pub fn demo_seed() -> Result<Vec<SeedProduct>, DomainError> {
    Ok(vec![
        SeedProduct::new("COF-001", "Coffee Beans 1kg", dec!(12.50), 10)?,
        SeedProduct::new("TEA-010", "Green Tea 20ct", dec!(4.25), 6)?,
        SeedProduct::new("SUG-100", "Cane Sugar 500g", dec!(2.10), 4)?,
        SeedProduct::new("MLK-020", "Oat Milk 1L", dec!(3.80), 8)?,
        SeedProduct::new("CHO-005", "Dark Chocolate 85%", dec!(5.95), 3)?,
    ])
}
