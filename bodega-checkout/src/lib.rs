//! Bodega Checkout Layer
//!
//! Concurrency-safe order processing over shared stock.
//!
//! # Architecture
//!
//! ```text
//! OrderRequest → Processor → Catalog (validate) → Lock Coordinator → Inventory → OrderResult
//! ```
//!
//! # Components
//!
//! - **Ports**: Trait defining the catalog interface consumed by checkout
//! - **Lock Coordinator**: Per-product mutual exclusion with sorted
//!   acquisition and a bounded deadline
//! - **Processor**: Orchestrates validate, lock, reserve, and rollback
//! - **Stub**: Catalog implementation for tests and the demo runtime
//!
//! # Example
//!
//! ```rust,ignore
//! use bodega_checkout::{LockCoordinator, OrderProcessor, ProcessorConfig, StubCatalog};
//! use bodega_store::MemoryStore;
//! use std::sync::Arc;
//!
//! // Create components
//! let catalog = Arc::new(StubCatalog::with_products(products));
//! let inventory = Arc::new(MemoryStore::new());
//! let locks = Arc::new(LockCoordinator::new());
//!
//! // Create processor
//! let processor = OrderProcessor::new(catalog, inventory, locks, ProcessorConfig::default());
//!
//! // Process a request
//! let result = processor.process(&request).await?;
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod locks;
pub mod ports;
pub mod processor;
pub mod stub;

// Re-exports for convenience
pub use error::{CheckoutError, CheckoutResult};
pub use locks::{LockAttempt, LockCoordinator, LockSet};
pub use ports::CatalogPort;
pub use processor::{OrderProcessor, ProcessorConfig};
pub use stub::StubCatalog;
