//! Simulation outcome summary.

use serde::Serialize;

/// Aggregate counts from one simulation run.
///
/// Produced only after the audit passed, so a report in hand already
/// means units were conserved and no stock level grew.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    /// Seed the run was generated from
    pub seed: u64,
    /// Products in the catalog
    pub products: usize,
    /// Batches submitted
    pub batches: usize,
    /// Requests across all batches
    pub requests: usize,
    /// Requests that committed
    pub committed: usize,
    /// Requests rejected for insufficient stock
    pub rejected_insufficient: usize,
    /// Requests rejected for an unknown product
    pub rejected_invalid: usize,
    /// Requests rejected on lock timeout
    pub rejected_timeout: usize,
    /// Units seeded at the start
    pub units_start: u64,
    /// Units on committed receipts
    pub units_committed: u64,
    /// Units still on the shelf at the end
    pub units_left: u64,
}

impl SimReport {
    /// Total rejected requests.
    pub fn rejected_total(&self) -> usize {
        self.rejected_insufficient + self.rejected_invalid + self.rejected_timeout
    }
}
