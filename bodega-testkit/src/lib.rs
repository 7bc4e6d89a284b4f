//! Test helpers for Bodega checkout tests.
//!
//! Provides catalog/product builders, stock seeding, and a fully wired
//! in-memory checkout stack.

mod helpers;

pub use helpers::{
    product, request, seed_checkout_stack, seed_checkout_stack_with, seed_stock, unknown_product,
    CheckoutStack, StockEntry,
};

use anyhow::Result;
use rust_decimal_macros::dec;

/// Seed a small corner-store catalog with generous stock.
///
/// Convenience function for tests that just need a working stack and do
/// not care about the exact products.
pub async fn default_checkout_stack() -> Result<CheckoutStack> {
    seed_checkout_stack(vec![
        StockEntry::new("COF-001", "Coffee Beans 1kg", dec!(12.50), 100),
        StockEntry::new("TEA-010", "Green Tea 20ct", dec!(4.25), 100),
        StockEntry::new("SUG-100", "Cane Sugar 500g", dec!(2.10), 100),
    ])
    .await
}
