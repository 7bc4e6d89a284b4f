//! Bodega Storage Layer
//!
//! Provides stock levels and receipt persistence behind port traits.
//!
//! # Architecture
//!
//! - **Port traits**: `Inventory` (atomic stock reservation) and
//!   `OrderRepository` (committed receipts)
//! - **In-memory store**: the production implementation for this core;
//!   per-product atomic counters so disjoint products never serialize
//!
//! # Usage
//!
//! ```rust
//! use bodega_store::{Inventory, MemoryStore};
//! use bodega_domain::Quantity;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MemoryStore::new();
//!     let product_id = Uuid::now_v7();
//!
//!     store.set_stock(product_id, 10).await.unwrap();
//!
//!     let reserved = store.try_reserve(product_id, Quantity::new(4).unwrap()).await.unwrap();
//!     assert!(reserved);
//!     assert_eq!(store.stock_of(product_id).await.unwrap(), Some(6));
//! }
//! ```

#![warn(clippy::all)]

// Modules
mod error;
mod memory;
mod repository;

// Re-exports
pub use error::StoreError;
pub use memory::MemoryStore;
pub use repository::{Inventory, OrderRepository};
