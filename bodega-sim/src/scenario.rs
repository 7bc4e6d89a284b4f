//! Randomized batch generation and the post-run audit.
//!
//! The scenario seeds a catalog, generates batches of requests from a
//! seeded RNG, runs them through a real [`BatchScheduler`], and audits
//! the final stock against the receipts.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use tracing::{debug, info};

use bodega_checkout::ProcessorConfig;
use bodega_domain::{CartLine, OrderRequest, ProductId, Quantity, RejectReason};
use bodega_scheduler::{BatchScheduler, SchedulerConfig};
use bodega_store::Inventory;
use bodega_testkit::{seed_checkout_stack_with, unknown_product, StockEntry};

use crate::error::{SimError, SimResult};
use crate::report::SimReport;

// =============================================================================
// Sim Config
// =============================================================================

/// Simulation parameters.
///
/// The same seed and parameters generate the same request stream. The
/// interleaving of workers still varies between runs, which is the point:
/// the audit must hold under any interleaving.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for catalog prices and request generation
    pub seed: u64,
    /// Products in the catalog
    pub products: usize,
    /// Starting stock per product
    pub stock_per_product: u32,
    /// Batches to run
    pub batches: usize,
    /// Requests per batch
    pub batch_size: usize,
    /// Most lines a generated request can have
    pub max_lines_per_request: usize,
    /// Most units a generated line can ask for
    pub max_units_per_line: u32,
    /// Probability a request references an unknown product
    pub invalid_rate: f64,
    /// Scheduler worker pool size
    pub workers: usize,
    /// Lock timeout handed to the processor
    pub lock_timeout: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            products: 8,
            stock_per_product: 50,
            batches: 20,
            batch_size: 32,
            max_lines_per_request: 3,
            max_units_per_line: 3,
            invalid_rate: 0.05,
            workers: 8,
            lock_timeout: Duration::from_secs(2),
        }
    }
}

impl SimConfig {
    fn validate(&self) -> SimResult<()> {
        if self.products == 0 {
            return Err(SimError::Config("products must be at least 1".to_string()));
        }
        if self.batches == 0 || self.batch_size == 0 {
            return Err(SimError::Config(
                "batches and batch_size must be at least 1".to_string(),
            ));
        }
        if self.max_lines_per_request == 0 || self.max_units_per_line == 0 {
            return Err(SimError::Config(
                "request shape limits must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.invalid_rate) {
            return Err(SimError::Config(format!(
                "invalid_rate must be within [0, 1], got {}",
                self.invalid_rate
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Simulation
// =============================================================================

/// Run one simulation to a verified report.
///
/// Fails with an audit error if units were created or destroyed, or if
/// any product ended above its seeded level.
pub async fn run_simulation(config: SimConfig) -> SimResult<SimReport> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);

    // Seed the catalog with generated products
    let entries: Vec<StockEntry> = (0..config.products)
        .map(|i| {
            StockEntry::new(
                &format!("SKU-{:03}", i),
                &format!("Simulated product {}", i),
                Decimal::new(rng.gen_range(100i64..5000), 2),
                config.stock_per_product,
            )
        })
        .collect();
    let stack = seed_checkout_stack_with(
        entries,
        ProcessorConfig { lock_timeout: config.lock_timeout },
    )
    .await
    .map_err(|e| SimError::Setup(e.to_string()))?;
    let product_ids: Vec<ProductId> = stack.products.iter().map(|p| p.id).collect();

    let scheduler = BatchScheduler::new(
        stack.processor.clone(),
        SchedulerConfig { workers: config.workers },
    );

    let units_start = config.products as u64 * config.stock_per_product as u64;
    info!(
        seed = config.seed,
        products = config.products,
        units_start,
        batches = config.batches,
        batch_size = config.batch_size,
        workers = config.workers,
        "Starting simulation"
    );

    let mut report = SimReport {
        seed: config.seed,
        products: config.products,
        batches: config.batches,
        requests: 0,
        committed: 0,
        rejected_insufficient: 0,
        rejected_invalid: 0,
        rejected_timeout: 0,
        units_start,
        units_committed: 0,
        units_left: 0,
    };

    for batch_index in 0..config.batches {
        let batch = generate_batch(&config, &product_ids, &mut rng)?;
        report.requests += batch.len();

        let results = scheduler.submit_batch(batch).await?;
        for result in &results {
            match result.receipt() {
                Some(receipt) => {
                    report.committed += 1;
                    report.units_committed += receipt.total_units();
                },
                None => match result.rejection().map(|r| &r.reason) {
                    Some(RejectReason::InsufficientStock { .. }) => {
                        report.rejected_insufficient += 1
                    },
                    Some(RejectReason::InvalidProduct { .. }) => report.rejected_invalid += 1,
                    Some(RejectReason::LockTimeout) => report.rejected_timeout += 1,
                    None => {},
                },
            }
        }
        debug!(
            batch = batch_index,
            committed = report.committed,
            "Batch audited"
        );
    }

    // Audit: per-product ceilings, then global conservation
    let levels = stack.inventory.levels().await?;
    for (product_id, level) in &levels {
        if *level > config.stock_per_product {
            return Err(SimError::StockExceeded {
                product_id: *product_id,
                level: *level,
                start: config.stock_per_product,
            });
        }
    }
    report.units_left = levels.values().map(|&v| v as u64).sum();

    let accounted = report.units_committed + report.units_left;
    if accounted != units_start {
        return Err(SimError::Conservation {
            expected: units_start,
            actual: accounted,
        });
    }

    info!(
        requests = report.requests,
        committed = report.committed,
        rejected = report.rejected_total(),
        units_committed = report.units_committed,
        units_left = report.units_left,
        "Simulation audit passed"
    );

    Ok(report)
}

/// Generate one batch of requests from the seeded RNG.
fn generate_batch(
    config: &SimConfig,
    product_ids: &[ProductId],
    rng: &mut StdRng,
) -> SimResult<Vec<OrderRequest>> {
    let mut batch = Vec::with_capacity(config.batch_size);
    for _ in 0..config.batch_size {
        let line_count = rng.gen_range(1..=config.max_lines_per_request);
        let mut lines = Vec::with_capacity(line_count);
        for _ in 0..line_count {
            let product_id = product_ids[rng.gen_range(0..product_ids.len())];
            let units = rng.gen_range(1..=config.max_units_per_line);
            lines.push(CartLine::new(product_id, Quantity::new(units)?));
        }
        // Sometimes poison one line with a product no catalog knows
        if config.invalid_rate > 0.0 && rng.gen_bool(config.invalid_rate) {
            lines[0] = CartLine::new(unknown_product(), lines[0].quantity);
        }
        batch.push(OrderRequest::new(lines)?);
    }
    Ok(batch)
}

// =============================================================================
// Tests
// =============================================================================
