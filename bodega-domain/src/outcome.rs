//! Checkout Outcomes for Bodega
//!
//! Every order request resolves to exactly one `OrderResult`: a committed
//! receipt or a typed rejection. Outcomes are immutable once produced and
//! owned by the caller.

use crate::entities::{OrderId, Product, ProductId, RequestId};
use crate::value_objects::{Price, Quantity};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// Line total
// =============================================================================

/// Calculate the monetary total of one receipt line
///
/// Line Total = Unit Price × Quantity
pub fn line_total(unit_price: &Price, quantity: &Quantity) -> Decimal {
    unit_price.as_decimal() * quantity.as_decimal()
}

// =============================================================================
// Receipt
// =============================================================================

/// ReceiptLine is a finalized order line with the price captured at commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLine {
    /// Product purchased
    pub product_id: ProductId,
    /// SKU code at commit time
    pub sku: String,
    /// Display name at commit time
    pub name: String,
    /// Units purchased
    pub quantity: Quantity,
    /// Unit price captured at commit time
    pub unit_price: Price,
    /// Unit price × quantity
    pub line_total: Decimal,
}

impl ReceiptLine {
    /// Build a receipt line from the catalog product and the reserved quantity
    pub fn new(product: &Product, quantity: Quantity) -> Self {
        Self {
            product_id: product.id,
            sku: product.sku.as_str().to_string(),
            name: product.name.clone(),
            quantity,
            unit_price: product.unit_price,
            line_total: line_total(&product.unit_price, &quantity),
        }
    }
}

/// Receipt is the record of a committed order
///
/// By the time a receipt exists, stock for every line has already been
/// decremented; the receipt is what the caller persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Identity of the committed order (time-ordered v7 UUID)
    pub order_id: OrderId,
    /// The request this receipt settles
    pub request_id: RequestId,
    /// Finalized lines, in submitted order
    pub lines: Vec<ReceiptLine>,
    /// Sum of all line totals
    pub total: Decimal,
    /// Commit timestamp
    pub committed_at: DateTime<Utc>,
}

impl Receipt {
    /// Build a receipt for a fully reserved request
    pub fn new(request_id: RequestId, lines: Vec<ReceiptLine>) -> Self {
        let total = lines.iter().map(|line| line.line_total).sum();
        Self {
            order_id: Uuid::now_v7(),
            request_id,
            lines,
            total,
            committed_at: Utc::now(),
        }
    }

    /// Total units across all lines
    pub fn total_units(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity.as_u32())).sum()
    }
}

// =============================================================================
// Rejection
// =============================================================================

/// RejectReason says why a request could not commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// A referenced product does not exist in the catalog
    InvalidProduct {
        /// The unknown product id
        product_id: ProductId,
    },

    /// A line asked for more units than were in stock
    InsufficientStock {
        /// Product that ran short
        product_id: ProductId,
        /// Units the line requested
        requested: u32,
        /// Units remaining when the reservation was attempted
        available: u32,
    },

    /// The per-product lock set could not be assembled within the bound
    LockTimeout,
}

impl RejectReason {
    /// Short machine-readable name
    pub fn name(&self) -> &'static str {
        match self {
            RejectReason::InvalidProduct { .. } => "INVALID_PRODUCT",
            RejectReason::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            RejectReason::LockTimeout => "LOCK_TIMEOUT",
        }
    }

    /// Whether resubmitting the identical request could succeed
    ///
    /// Only lock timeouts are transient: nothing was mutated and the
    /// contention that caused them drains. Invalid products and stock
    /// shortfalls reject the same request again.
    pub fn is_transient(&self) -> bool {
        matches!(self, RejectReason::LockTimeout)
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::InvalidProduct { product_id } => {
                write!(f, "unknown product {}", product_id)
            },
            RejectReason::InsufficientStock { product_id, requested, available } => {
                write!(
                    f,
                    "insufficient stock for {}: requested {}, available {}",
                    product_id, requested, available
                )
            },
            RejectReason::LockTimeout => write!(f, "lock acquisition timed out"),
        }
    }
}

/// Rejection is the definitive no for one request
///
/// Stock state is untouched: every reservation made while processing the
/// request was rolled back before this value was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// The request that was rejected
    pub request_id: RequestId,
    /// Why it could not commit
    pub reason: RejectReason,
    /// When the rejection was produced
    pub rejected_at: DateTime<Utc>,
}

impl Rejection {
    /// Build a rejection for a request
    pub fn new(request_id: RequestId, reason: RejectReason) -> Self {
        Self {
            request_id,
            reason,
            rejected_at: Utc::now(),
        }
    }
}

// =============================================================================
// OrderResult
// =============================================================================

/// OrderResult is the definitive outcome of one order request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderResult {
    /// The order committed; stock was decremented and a receipt produced
    Committed(Receipt),
    /// The order was rejected; stock is exactly as it was before
    Rejected(Rejection),
}

impl OrderResult {
    /// True when this outcome carries a receipt
    pub fn is_committed(&self) -> bool {
        matches!(self, OrderResult::Committed(_))
    }

    /// The receipt, when committed
    pub fn receipt(&self) -> Option<&Receipt> {
        match self {
            OrderResult::Committed(receipt) => Some(receipt),
            OrderResult::Rejected(_) => None,
        }
    }

    /// The rejection, when rejected
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            OrderResult::Committed(_) => None,
            OrderResult::Rejected(rejection) => Some(rejection),
        }
    }

    /// The request this outcome settles
    pub fn request_id(&self) -> RequestId {
        match self {
            OrderResult::Committed(receipt) => receipt.request_id,
            OrderResult::Rejected(rejection) => rejection.request_id,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Sku;
    use rust_decimal_macros::dec;

    fn create_test_product(code: &str, price: Decimal) -> Product {
        Product::new(Sku::new(code).unwrap(), format!("Product {}", code), Price::new(price).unwrap())
    }

    #[test]
    fn test_line_total() {
        let price = Price::new(dec!(12.50)).unwrap();
        let qty = Quantity::new(3).unwrap();
        assert_eq!(line_total(&price, &qty), dec!(37.50));
    }

    #[test]
    fn test_receipt_totals() {
        let coffee = create_test_product("COF-001", dec!(12.50));
        let tea = create_test_product("TEA-001", dec!(4.25));

        let lines = vec![
            ReceiptLine::new(&coffee, Quantity::new(2).unwrap()),
            ReceiptLine::new(&tea, Quantity::new(4).unwrap()),
        ];
        let receipt = Receipt::new(Uuid::now_v7(), lines);

        // 2 x 12.50 + 4 x 4.25 = 25.00 + 17.00
        assert_eq!(receipt.total, dec!(42.00));
        assert_eq!(receipt.total_units(), 6);
        assert_eq!(receipt.lines[0].line_total, dec!(25.00));
        assert_eq!(receipt.lines[1].line_total, dec!(17.00));
    }

    #[test]
    fn test_receipt_captures_commit_price() {
        let product = create_test_product("COF-001", dec!(9.99));
        let line = ReceiptLine::new(&product, Quantity::new(1).unwrap());
        assert_eq!(line.unit_price, product.unit_price);
        assert_eq!(line.sku, "COF-001");
    }

    #[test]
    fn test_reject_reason_names() {
        let invalid = RejectReason::InvalidProduct { product_id: Uuid::now_v7() };
        let short = RejectReason::InsufficientStock {
            product_id: Uuid::now_v7(),
            requested: 5,
            available: 2,
        };

        assert_eq!(invalid.name(), "INVALID_PRODUCT");
        assert_eq!(short.name(), "INSUFFICIENT_STOCK");
        assert_eq!(RejectReason::LockTimeout.name(), "LOCK_TIMEOUT");
    }

    #[test]
    fn test_only_lock_timeout_is_transient() {
        let invalid = RejectReason::InvalidProduct { product_id: Uuid::now_v7() };
        let short = RejectReason::InsufficientStock {
            product_id: Uuid::now_v7(),
            requested: 5,
            available: 2,
        };

        assert!(!invalid.is_transient());
        assert!(!short.is_transient());
        assert!(RejectReason::LockTimeout.is_transient());
    }

    #[test]
    fn test_order_result_accessors() {
        let request_id = Uuid::now_v7();
        let committed = OrderResult::Committed(Receipt::new(request_id, vec![]));
        let rejected =
            OrderResult::Rejected(Rejection::new(request_id, RejectReason::LockTimeout));

        assert!(committed.is_committed());
        assert!(committed.receipt().is_some());
        assert!(committed.rejection().is_none());
        assert_eq!(committed.request_id(), request_id);

        assert!(!rejected.is_committed());
        assert!(rejected.receipt().is_none());
        assert!(rejected.rejection().is_some());
        assert_eq!(rejected.request_id(), request_id);
    }

    #[test]
    fn test_order_result_serializes() {
        let rejection = Rejection::new(
            Uuid::now_v7(),
            RejectReason::InsufficientStock {
                product_id: Uuid::now_v7(),
                requested: 3,
                available: 1,
            },
        );
        let json = serde_json::to_string(&OrderResult::Rejected(rejection)).unwrap();
        assert!(json.contains("InsufficientStock"));
        assert!(json.contains("\"requested\":3"));
    }
}
