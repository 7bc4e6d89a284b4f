//! Bodega Domain Layer
//!
//! Pure domain logic with zero I/O dependencies.
//! Contains entities, value objects, and checkout outcome types.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod entities;
pub mod outcome;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{CartLine, OrderId, OrderRequest, Product, ProductId, RequestId};
pub use outcome::{OrderResult, Receipt, ReceiptLine, RejectReason, Rejection};
pub use value_objects::{DomainError, Price, Quantity, Sku};
