//! Domain Entities for Bodega
//!
//! Catalog products and the order request that flows through checkout.
//! Entities carry identity; validation happens at construction time.

use crate::value_objects::{DomainError, Price, Quantity, Sku};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

// =============================================================================
// Identifiers
// =============================================================================

/// Unique identifier for a Product
pub type ProductId = Uuid;

/// Unique identifier for a committed Order
pub type OrderId = Uuid;

/// Unique identifier for an OrderRequest submission
pub type RequestId = Uuid;

// =============================================================================
// Product
// =============================================================================

/// Product is a catalog entry priced per unit
///
/// Stock is not a field here. Stock levels live in the inventory store,
/// keyed by product id, so catalog reads never race stock mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable identity (time-ordered v7 UUID)
    pub id: ProductId,
    /// Merchant-facing stock keeping unit code
    pub sku: Sku,
    /// Display name
    pub name: String,
    /// Unit price at catalog time
    pub unit_price: Price,
}

impl Product {
    /// Create a new product with a fresh id
    pub fn new(sku: Sku, name: impl Into<String>, unit_price: Price) -> Self {
        Self {
            id: Uuid::now_v7(),
            sku,
            name: name.into(),
            unit_price,
        }
    }
}

// =============================================================================
// CartLine
// =============================================================================

/// CartLine pairs a product with a requested unit count
///
/// Ephemeral: it exists inside an [`OrderRequest`] and is consumed by
/// checkout. The same product may appear on more than one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product being purchased
    pub product_id: ProductId,
    /// Units requested (> 0 by construction)
    pub quantity: Quantity,
}

impl CartLine {
    /// Create a cart line
    pub fn new(product_id: ProductId, quantity: Quantity) -> Self {
        Self { product_id, quantity }
    }
}

// =============================================================================
// OrderRequest
// =============================================================================

/// OrderRequest is one atomic checkout submission
///
/// All lines commit together or none do; partial fulfillment is never
/// produced. Line order is preserved because reservation (and rollback)
/// walk the lines in submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Identity of this submission (time-ordered v7 UUID)
    pub id: RequestId,
    /// Requested lines, in submitted order
    pub lines: Vec<CartLine>,
    /// When the request was constructed
    pub submitted_at: DateTime<Utc>,
}

impl OrderRequest {
    /// Create a request from cart lines
    ///
    /// # Examples
    /// ```
    /// # use bodega_domain::entities::{CartLine, OrderRequest};
    /// # use bodega_domain::value_objects::Quantity;
    /// # use uuid::Uuid;
    /// let line = CartLine::new(Uuid::now_v7(), Quantity::new(2).unwrap());
    /// let request = OrderRequest::new(vec![line]).unwrap();
    /// assert_eq!(request.lines.len(), 1);
    /// ```
    ///
    /// # Errors
    /// Returns `DomainError::InvalidOrderRequest` if `lines` is empty
    pub fn new(lines: Vec<CartLine>) -> Result<Self, DomainError> {
        if lines.is_empty() {
            return Err(DomainError::InvalidOrderRequest(
                "Order request must contain at least one line".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::now_v7(),
            lines,
            submitted_at: Utc::now(),
        })
    }

    /// Distinct products referenced by this request, in ascending id order
    ///
    /// This is the canonical lock-acquisition order: every checkout locks
    /// products in ascending id order, so two requests can never hold
    /// locks in opposing order.
    pub fn distinct_products(&self) -> BTreeSet<ProductId> {
        self.lines.iter().map(|line| line.product_id).collect()
    }

    /// Total units requested across all lines for one product
    pub fn requested_units(&self, product_id: ProductId) -> u64 {
        self.lines
            .iter()
            .filter(|line| line.product_id == product_id)
            .map(|line| u64::from(line.quantity.as_u32()))
            .sum()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn create_test_product(code: &str, price: rust_decimal::Decimal) -> Product {
        Product::new(Sku::new(code).unwrap(), format!("Product {}", code), Price::new(price).unwrap())
    }

    #[test]
    fn test_product_new_assigns_identity() {
        let a = create_test_product("COF-001", dec!(12.50));
        let b = create_test_product("COF-001", dec!(12.50));
        assert_ne!(a.id, b.id);
        assert_eq!(a.sku, b.sku);
    }

    #[test]
    fn test_order_request_rejects_empty() {
        let result = OrderRequest::new(vec![]);
        assert!(matches!(result, Err(DomainError::InvalidOrderRequest(_))));
    }

    #[test]
    fn test_order_request_preserves_line_order() {
        let first = Uuid::now_v7();
        let second = Uuid::now_v7();
        let request = OrderRequest::new(vec![
            CartLine::new(second, Quantity::new(1).unwrap()),
            CartLine::new(first, Quantity::new(2).unwrap()),
        ])
        .unwrap();

        assert_eq!(request.lines[0].product_id, second);
        assert_eq!(request.lines[1].product_id, first);
    }

    #[test]
    fn test_distinct_products_sorted_and_deduplicated() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let request = OrderRequest::new(vec![
            CartLine::new(b, Quantity::new(1).unwrap()),
            CartLine::new(a, Quantity::new(2).unwrap()),
            CartLine::new(b, Quantity::new(3).unwrap()),
        ])
        .unwrap();

        let distinct: Vec<ProductId> = request.distinct_products().into_iter().collect();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(distinct, expected);
    }

    #[test]
    fn test_requested_units_sums_duplicate_lines() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let request = OrderRequest::new(vec![
            CartLine::new(a, Quantity::new(2).unwrap()),
            CartLine::new(b, Quantity::new(5).unwrap()),
            CartLine::new(a, Quantity::new(3).unwrap()),
        ])
        .unwrap();

        assert_eq!(request.requested_units(a), 5);
        assert_eq!(request.requested_units(b), 5);
        assert_eq!(request.requested_units(Uuid::now_v7()), 0);
    }
}
