//! Daemon: demo runtime orchestrator.
//!
//! The Daemon ties together all components:
//! - Seeded catalog and inventory (demo data)
//! - Batch Scheduler (bounded worker pool)
//! - Order Processor (checkout pipeline)
//! - Order Repository (receipt persistence)
//!
//! # Lifecycle
//!
//! 1. Load configuration
//! 2. Initialize components
//! 3. Seed the inventory
//! 4. Run the contended demo batch
//! 5. Persist receipts for committed orders
//! 6. Reconcile final stock against receipts

use std::sync::Arc;

use tracing::{info, warn};

use bodega_checkout::{CatalogPort, LockCoordinator, OrderProcessor, ProcessorConfig, StubCatalog};
use bodega_domain::{CartLine, OrderRequest, Quantity};
use bodega_scheduler::{BatchScheduler, SchedulerConfig};
use bodega_store::{Inventory, MemoryStore, OrderRepository};

use crate::config::Config;
use crate::error::{DaemonError, DaemonResult};
use crate::seed::{demo_seed, SeedProduct};

// =============================================================================
// Daemon
// =============================================================================

/// The main Bodega daemon.
pub struct Daemon<C: CatalogPort + 'static, S: Inventory + OrderRepository + 'static> {
    /// Configuration
    config: Config,
    /// Seeded catalog entries with starting stock
    seed: Vec<SeedProduct>,
    /// Store (inventory and receipts)
    store: Arc<S>,
    /// Batch scheduler over the checkout pipeline
    scheduler: BatchScheduler<C, S>,
}

impl Daemon<StubCatalog, MemoryStore> {
    /// Create a new daemon with stub components (for testing/development).
    pub fn new_stub(config: Config) -> DaemonResult<Self> {
        let seed = demo_seed()?;
        let products = seed.iter().map(|s| s.product.clone()).collect();
        let catalog = Arc::new(StubCatalog::with_products(products));
        let store = Arc::new(MemoryStore::new());
        let processor = Arc::new(OrderProcessor::new(
            catalog,
            Arc::clone(&store),
            Arc::new(LockCoordinator::new()),
            ProcessorConfig {
                lock_timeout: config.checkout.lock_timeout(),
            },
        ));
        let scheduler = BatchScheduler::new(
            processor,
            SchedulerConfig {
                workers: config.pool.workers,
            },
        );

        Ok(Self {
            config,
            seed,
            store,
            scheduler,
        })
    }
}

impl<C: CatalogPort + 'static, S: Inventory + OrderRepository + 'static> Daemon<C, S> {
    /// Create a new daemon with provided components.
    pub fn new(
        config: Config,
        seed: Vec<SeedProduct>,
        store: Arc<S>,
        scheduler: BatchScheduler<C, S>,
    ) -> Self {
        Self {
            config,
            seed,
            store,
            scheduler,
        }
    }

    /// Run the demo workload to completion.
    pub async fn run(self) -> DaemonResult<()> {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            environment = %self.config.environment,
            workers = self.scheduler.worker_count(),
            "Starting Bodega daemon"
        );

        // 1. Seed the inventory
        let units_seeded = self.seed_inventory().await?;

        // 2. Run the contended demo batch
        let batch = self.demo_batch()?;
        info!(orders = batch.len(), "Submitting demo batch");
        let results = self.scheduler.submit_batch(batch).await?;

        // 3. Persist receipts for committed orders
        let mut committed = 0usize;
        for result in &results {
            match result.receipt() {
                Some(receipt) => {
                    self.store.save(receipt).await?;
                    committed += 1;
                },
                None => {
                    if let Some(rejection) = result.rejection() {
                        warn!(
                            request_id = %rejection.request_id,
                            reason = %rejection.reason,
                            "Demo order rejected"
                        );
                    }
                },
            }
        }
        info!(
            committed,
            rejected = results.len() - committed,
            "Demo batch complete"
        );

        // 4. Reconcile final stock against receipts
        self.reconcile(units_seeded).await?;

        Ok(())
    }

    /// Set every seeded product's starting stock.
    async fn seed_inventory(&self) -> DaemonResult<u64> {
        let mut units_seeded = 0u64;
        for entry in &self.seed {
            self.store.set_stock(entry.product.id, entry.units).await?;
            units_seeded += entry.units as u64;
        }
        info!(
            products = self.seed.len(),
            units = units_seeded,
            "Inventory seeded"
        );
        Ok(units_seeded)
    }

    /// Build overlapping two-line orders over the seeded catalog.
    ///
    /// Order `i` takes products `i` and `i + 1` (mod catalog size), so
    /// neighbours compete for the same stock and the tight seed levels
    /// force some rejections. An empty catalog yields an empty batch.
    fn demo_batch(&self) -> DaemonResult<Vec<OrderRequest>> {
        if self.seed.is_empty() {
            return Ok(Vec::new());
        }
        let quantity = Quantity::new(self.config.demo.units_per_order)?;
        let count = self.seed.len();
        let mut batch = Vec::with_capacity(self.config.demo.orders);
        for i in 0..self.config.demo.orders {
            let first = self.seed[i % count].product.id;
            let second = self.seed[(i + 1) % count].product.id;
            batch.push(OrderRequest::new(vec![
                CartLine::new(first, quantity),
                CartLine::new(second, quantity),
            ])?);
        }
        Ok(batch)
    }

    /// Check that every seeded unit is either on a receipt or still in stock.
    async fn reconcile(&self, units_seeded: u64) -> DaemonResult<()> {
        let receipts = self.store.find_all().await?;
        let units_sold: u64 = receipts.iter().map(|r| r.total_units()).sum();
        let units_left: u64 = self
            .store
            .levels()
            .await?
            .values()
            .map(|&v| v as u64)
            .sum();

        let accounted = units_sold + units_left;
        if accounted != units_seeded {
            return Err(DaemonError::Reconciliation {
                expected: units_seeded,
                actual: accounted,
            });
        }

        info!(
            receipts = receipts.len(),
            units_sold,
            units_left,
            locks = self.scheduler.processor().locks().lock_count(),
            "Stock reconciled, shutdown complete"
        );

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daemon_stub_creation() {
        let daemon = Daemon::new_stub(Config::test()).unwrap();

        // Demo batch matches the configured order count
        assert_eq!(daemon.demo_batch().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_seed_inventory_sets_levels() {
        let daemon = Daemon::new_stub(Config::test()).unwrap();

        let units = daemon.seed_inventory().await.unwrap();
        assert_eq!(units, 31);

        let levels = daemon.store.levels().await.unwrap();
        assert_eq!(levels.len(), 5);
    }

    #[tokio::test]
    async fn test_demo_run_reconciles() {
        let daemon = Daemon::new_stub(Config::test()).unwrap();

        // run() fails if the books do not balance afterwards
        daemon.run().await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_seed_runs_cleanly() {
        let store = Arc::new(MemoryStore::new());
        let processor = Arc::new(OrderProcessor::new(
            Arc::new(StubCatalog::new()),
            Arc::clone(&store),
            Arc::new(LockCoordinator::new()),
            ProcessorConfig::default(),
        ));
        let scheduler = BatchScheduler::new(processor, SchedulerConfig { workers: 1 });
        let daemon = Daemon::new(Config::test(), Vec::new(), store, scheduler);

        // Nothing to order: the batch is empty and the run still reconciles
        assert!(daemon.demo_batch().unwrap().is_empty());
        daemon.run().await.unwrap();
    }
}
