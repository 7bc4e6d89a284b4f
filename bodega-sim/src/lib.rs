//! Stress simulation for Bodega.
//!
//! Drives randomized order batches through the real scheduler, processor,
//! and inventory, then audits the outcome: every unit that left the shelf
//! must appear on exactly one receipt, and no product may end above its
//! seeded level. A fixed seed reproduces the same request stream.
//!
//! # Example
//!
//! ```rust,ignore
//! let report = run_simulation(SimConfig::default()).await?;
//! println!("{} of {} committed", report.committed, report.requests);
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod report;
pub mod scenario;

pub use error::{SimError, SimResult};
pub use report::SimReport;
pub use scenario::{run_simulation, SimConfig};
