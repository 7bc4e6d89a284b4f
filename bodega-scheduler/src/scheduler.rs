//! Bounded worker pool for order batches.
//!
//! Each request in a batch becomes one tokio task; a semaphore caps how
//! many run checkout at the same time. The batch call returns only when
//! every task has finished, so callers see a complete, positionally
//! aligned set of outcomes.
//!
//! # Flow
//!
//! ```text
//! submit_batch(requests)
//!   → spawn one task per request
//!   → each task takes a pool permit, runs the processor, releases
//!   → join all tasks in submission order
//!   → Vec<OrderResult> (results[i] answers requests[i])
//! ```

use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use bodega_checkout::{CatalogPort, OrderProcessor};
use bodega_domain::{OrderRequest, OrderResult};
use bodega_store::Inventory;

use crate::error::{SchedulerError, SchedulerResult};

// =============================================================================
// Scheduler Config
// =============================================================================

/// Worker pool tuning.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Maximum requests in checkout at once
    pub workers: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        }
    }
}

// =============================================================================
// Batch Scheduler
// =============================================================================

/// Runs order batches through a shared processor on a bounded pool.
///
/// Results keep submission order: `results[i]` is the outcome of
/// `requests[i]` regardless of which worker ran it or when it finished.
/// If any worker hits an infrastructure fault, the batch still drains
/// every remaining task before the error is returned.
pub struct BatchScheduler<C: CatalogPort + 'static, I: Inventory + 'static> {
    /// Shared checkout pipeline
    processor: Arc<OrderProcessor<C, I>>,
    /// Pool permits
    permits: Arc<Semaphore>,
    /// Tuning
    config: SchedulerConfig,
}

impl<C: CatalogPort + 'static, I: Inventory + 'static> BatchScheduler<C, I> {
    /// Create a new scheduler over a processor.
    ///
    /// A `workers` value of zero is clamped to one.
    pub fn new(processor: Arc<OrderProcessor<C, I>>, config: SchedulerConfig) -> Self {
        let workers = config.workers.max(1);
        Self {
            processor,
            permits: Arc::new(Semaphore::new(workers)),
            config: SchedulerConfig { workers },
        }
    }

    /// Get the worker pool size.
    pub fn worker_count(&self) -> usize {
        self.config.workers
    }

    /// Get the shared processor.
    pub fn processor(&self) -> &OrderProcessor<C, I> {
        &self.processor
    }

    /// Run a batch of requests to completion.
    ///
    /// Returns one [`OrderResult`] per request, in submission order. An
    /// `Err` means some worker failed on infrastructure; the batch is
    /// fully drained first, so sibling requests still ran to their own
    /// outcome and stock reflects every commit that happened.
    pub async fn submit_batch(
        &self,
        requests: Vec<OrderRequest>,
    ) -> SchedulerResult<Vec<OrderResult>> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        info!(
            requests = requests.len(),
            workers = self.config.workers,
            "Submitting order batch"
        );

        let mut handles = Vec::with_capacity(requests.len());
        for request in requests {
            let processor = Arc::clone(&self.processor);
            let permits = Arc::clone(&self.permits);
            handles.push(tokio::spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| SchedulerError::Pool(format!("Worker pool closed: {}", e)))?;
                debug!(request_id = %request.id, "Worker picked up request");
                let result = processor.process(&request).await?;
                Ok::<OrderResult, SchedulerError>(result)
            }));
        }

        // Join in submission order so results line up with requests.
        // The first failure is remembered but every task is still drained.
        let mut results = Vec::with_capacity(handles.len());
        let mut first_error: Option<SchedulerError> = None;
        for handle in handles {
            match handle.await {
                Ok(Ok(result)) => results.push(result),
                Ok(Err(e)) => {
                    warn!(error = %e, "Worker finished with error");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                },
                Err(e) => {
                    warn!(error = %e, "Worker task failed to complete");
                    if first_error.is_none() {
                        first_error = Some(SchedulerError::Worker(e.to_string()));
                    }
                },
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        let committed = results.iter().filter(|r| r.is_committed()).count();
        info!(
            requests = results.len(),
            committed,
            rejected = results.len() - committed,
            "Batch complete"
        );

        Ok(results)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bodega_checkout::{LockCoordinator, ProcessorConfig, StubCatalog};
    use bodega_domain::{CartLine, Price, Product, ProductId, Quantity, RejectReason, Sku};
    use bodega_store::MemoryStore;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::time::Duration;
    use uuid::Uuid;

    fn create_test_product(code: &str, price: Decimal) -> Product {
        Product::new(Sku::new(code).unwrap(), format!("Product {}", code), Price::new(price).unwrap())
    }

    fn create_test_request(lines: &[(ProductId, u32)]) -> OrderRequest {
        OrderRequest::new(
            lines
                .iter()
                .map(|(id, units)| CartLine::new(*id, Quantity::new(*units).unwrap()))
                .collect(),
        )
        .unwrap()
    }

    async fn create_test_scheduler(
        products: Vec<Product>,
        stock: &[(ProductId, u32)],
        workers: usize,
    ) -> BatchScheduler<StubCatalog, MemoryStore> {
        let catalog = Arc::new(StubCatalog::with_products(products));
        let inventory = Arc::new(MemoryStore::new());
        for (product_id, units) in stock {
            inventory.set_stock(*product_id, *units).await.unwrap();
        }
        let processor = Arc::new(OrderProcessor::new(
            catalog,
            inventory,
            Arc::new(LockCoordinator::new()),
            ProcessorConfig { lock_timeout: Duration::from_secs(5) },
        ));
        BatchScheduler::new(processor, SchedulerConfig { workers })
    }

    #[test]
    fn test_config_default_has_workers() {
        assert!(SchedulerConfig::default().workers >= 1);
    }

    #[tokio::test]
    async fn test_zero_workers_clamped_to_one() {
        let scheduler = create_test_scheduler(Vec::new(), &[], 0).await;
        assert_eq!(scheduler.worker_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_batch_returns_empty() {
        let scheduler = create_test_scheduler(Vec::new(), &[], 2).await;
        let results = scheduler.submit_batch(Vec::new()).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_results_align_with_submission_order() {
        let coffee = create_test_product("COF-001", dec!(12.50));
        let coffee_id = coffee.id;
        let unknown = Uuid::now_v7();
        let scheduler = create_test_scheduler(vec![coffee], &[(coffee_id, 5)], 3).await;

        let batch = vec![
            create_test_request(&[(coffee_id, 1)]),
            create_test_request(&[(unknown, 1)]),
            create_test_request(&[(coffee_id, 1)]),
        ];
        let ids: Vec<_> = batch.iter().map(|r| r.id).collect();

        let results = scheduler.submit_batch(batch).await.unwrap();
        assert_eq!(results.len(), 3);
        for (result, id) in results.iter().zip(&ids) {
            assert_eq!(result.request_id(), *id);
        }

        // The invalid request in the middle does not disturb its siblings
        assert!(results[0].is_committed());
        assert_eq!(
            results[1].rejection().map(|r| &r.reason),
            Some(&RejectReason::InvalidProduct { product_id: unknown })
        );
        assert!(results[2].is_committed());
        assert_eq!(
            scheduler.processor().inventory().stock_of(coffee_id).await.unwrap(),
            Some(3)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_contended_pair_single_winner() {
        // Stock {A:5, B:3}; one order wants [A:3, B:3], the other [A:3].
        // Both cannot fit: whoever commits first starves the other of A.
        let a_product = create_test_product("SKU-A", dec!(10.00));
        let b_product = create_test_product("SKU-B", dec!(5.00));
        let (a, b) = (a_product.id, b_product.id);
        let scheduler = create_test_scheduler(
            vec![a_product, b_product],
            &[(a, 5), (b, 3)],
            2,
        )
        .await;

        let results = scheduler
            .submit_batch(vec![
                create_test_request(&[(a, 3), (b, 3)]),
                create_test_request(&[(a, 3)]),
            ])
            .await
            .unwrap();

        let committed = results.iter().filter(|r| r.is_committed()).count();
        assert_eq!(committed, 1);

        let inventory = scheduler.processor().inventory();
        assert_eq!(inventory.stock_of(a).await.unwrap(), Some(2));
        let expected_b = if results[0].is_committed() { 0 } else { 3 };
        assert_eq!(inventory.stock_of(b).await.unwrap(), Some(expected_b));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_batch_depletes_stock_exactly() {
        // Five orders of 2 units each against stock 10: all commit
        let coffee = create_test_product("COF-001", dec!(12.50));
        let coffee_id = coffee.id;
        let scheduler = create_test_scheduler(vec![coffee], &[(coffee_id, 10)], 4).await;

        let batch: Vec<_> = (0..5).map(|_| create_test_request(&[(coffee_id, 2)])).collect();
        let results = scheduler.submit_batch(batch).await.unwrap();

        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.is_committed()));
        assert_eq!(
            scheduler.processor().inventory().stock_of(coffee_id).await.unwrap(),
            Some(0)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_oversubscribed_batch_drains_fully() {
        // Six orders of 1 against stock 3: exactly three commit, and the
        // barrier still returns an outcome for every request
        let coffee = create_test_product("COF-001", dec!(12.50));
        let coffee_id = coffee.id;
        let scheduler = create_test_scheduler(vec![coffee], &[(coffee_id, 3)], 2).await;

        let batch: Vec<_> = (0..6).map(|_| create_test_request(&[(coffee_id, 1)])).collect();
        let results = scheduler.submit_batch(batch).await.unwrap();

        assert_eq!(results.len(), 6);
        let committed = results.iter().filter(|r| r.is_committed()).count();
        assert_eq!(committed, 3);
        assert!(results
            .iter()
            .filter_map(|r| r.rejection())
            .all(|r| matches!(r.reason, RejectReason::InsufficientStock { .. })));
        assert_eq!(
            scheduler.processor().inventory().stock_of(coffee_id).await.unwrap(),
            Some(0)
        );
    }

    #[tokio::test]
    async fn test_single_worker_pool_serializes() {
        let coffee = create_test_product("COF-001", dec!(12.50));
        let coffee_id = coffee.id;
        let scheduler = create_test_scheduler(vec![coffee], &[(coffee_id, 2)], 1).await;

        let batch: Vec<_> = (0..4).map(|_| create_test_request(&[(coffee_id, 1)])).collect();
        let results = scheduler.submit_batch(batch).await.unwrap();

        assert_eq!(results.len(), 4);
        assert_eq!(results.iter().filter(|r| r.is_committed()).count(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_units_conserved_under_contention() {
        // 40 orders of 3 units against stock 100: committed * 3 + leftover
        // must equal the starting stock
        let coffee = create_test_product("COF-001", dec!(12.50));
        let coffee_id = coffee.id;
        let scheduler = create_test_scheduler(vec![coffee], &[(coffee_id, 100)], 8).await;

        let batch: Vec<_> = (0..40).map(|_| create_test_request(&[(coffee_id, 3)])).collect();
        let results = scheduler.submit_batch(batch).await.unwrap();

        let committed = results.iter().filter(|r| r.is_committed()).count() as u32;
        let leftover = scheduler
            .processor()
            .inventory()
            .stock_of(coffee_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(committed * 3 + leftover, 100);
        assert_eq!(committed, 33);
        assert_eq!(leftover, 1);
    }

    #[tokio::test]
    async fn test_worker_fault_drains_batch_before_error() {
        let coffee = create_test_product("COF-001", dec!(12.50));
        let coffee_id = coffee.id;

        let catalog = Arc::new(StubCatalog::with_products(vec![coffee]));
        let inventory = Arc::new(MemoryStore::new());
        inventory.set_stock(coffee_id, 5).await.unwrap();
        let processor = Arc::new(OrderProcessor::new(
            Arc::clone(&catalog),
            Arc::clone(&inventory),
            Arc::new(LockCoordinator::new()),
            ProcessorConfig::default(),
        ));
        let scheduler = BatchScheduler::new(processor, SchedulerConfig { workers: 1 });

        // One of the two lookups hits the injected fault; the other
        // request still runs to commit before the batch reports the error
        catalog.set_fail_next(true);
        let batch = vec![
            create_test_request(&[(coffee_id, 1)]),
            create_test_request(&[(coffee_id, 1)]),
        ];
        let result = scheduler.submit_batch(batch).await;

        assert!(matches!(result, Err(SchedulerError::Checkout(_))));
        assert_eq!(inventory.stock_of(coffee_id).await.unwrap(), Some(4));
    }
}
