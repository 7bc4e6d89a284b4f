//! Bodega Daemon Library
//!
//! Demo runtime for the Bodega checkout subsystem.
//!
//! # Architecture
//!
//! ```text
//! Config (env) → Daemon → Seeded Catalog + Inventory
//!                   │
//!                   ▼
//!            Batch Scheduler → Order Processor → Lock Coordinator
//!                   │                                  │
//!                   ▼                                  ▼
//!            Receipts (order repository)        Stock (inventory)
//! ```
//!
//! # Components
//!
//! - **Daemon**: wires the stack, runs the contended demo batch, reconciles
//! - **Config**: environment-based configuration
//! - **Seed**: deterministic demo catalog with starting stock
//!
//! # Example
//!
//! ```rust,ignore
//! use bodegad::{Config, Daemon};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().expect("Failed to load config");
//!     let daemon = Daemon::new_stub(config).expect("Failed to build daemon");
//!     daemon.run().await.expect("Daemon error");
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod daemon;
pub mod error;
pub mod seed;

// Re-exports for convenience
pub use config::{CheckoutConfig, Config, DemoConfig, Environment, PoolConfig};
pub use daemon::Daemon;
pub use error::{DaemonError, DaemonResult};
pub use seed::{demo_seed, SeedProduct};
