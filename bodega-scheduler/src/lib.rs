//! Batch scheduling for Bodega.
//!
//! This crate runs batches of order requests through a shared
//! [`OrderProcessor`](bodega_checkout::OrderProcessor) on a bounded pool
//! of tokio workers. Submission returns once every request in the batch
//! has a definitive outcome, with results aligned to submission order.
//!
//! # Example
//!
//! ```rust,ignore
//! let scheduler = BatchScheduler::new(processor, SchedulerConfig::default());
//! let results = scheduler.submit_batch(requests).await?;
//! for result in &results {
//!     println!("{}", result.is_committed());
//! }
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use scheduler::{BatchScheduler, SchedulerConfig};
