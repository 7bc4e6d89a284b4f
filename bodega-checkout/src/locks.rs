//! Per-product lock coordination.
//!
//! Every product maps to one async mutex, created lazily and kept for
//! the process lifetime. A checkout acquires all of its products' locks
//! in ascending product id order under a single deadline: sorted order
//! makes opposing carts deadlock-free, the deadline bounds how long a
//! contended order can stall, and a timeout releases every lock already
//! held before it is reported.
//!
//! # Flow
//!
//! ```text
//! OrderRequest → distinct_products() → acquire_all → LockSet (released on drop)
//! ```
//!
//! Waiters queue on each mutex (tokio mutexes are queue-fair), so
//! starvation is bounded; stricter fairness is not promised.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

use bodega_domain::ProductId;

use crate::error::{CheckoutError, CheckoutResult};

// =============================================================================
// Lock Set
// =============================================================================

/// Scoped ownership of one order's product locks.
///
/// Guards are held in ascending product id order and all release
/// together when the set drops.
#[derive(Debug)]
pub struct LockSet {
    guards: Vec<OwnedMutexGuard<()>>,
}

impl LockSet {
    /// Number of product locks held.
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// True when no locks are held.
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

/// Outcome of a lock-set acquisition attempt.
#[derive(Debug)]
pub enum LockAttempt {
    /// Every requested lock is held
    Acquired(LockSet),
    /// The deadline passed; partial locks were already released
    TimedOut,
}

// =============================================================================
// Lock Coordinator
// =============================================================================

/// Lazily grown map of per-product async mutexes.
///
/// The outer `RwLock` only guards map structure. Entries are never
/// removed; the map grows to the working set of products and stays
/// there for the process lifetime.
pub struct LockCoordinator {
    locks: RwLock<HashMap<ProductId, Arc<Mutex<()>>>>,
}

impl LockCoordinator {
    /// Create a coordinator with no lock entries.
    pub fn new() -> Self {
        Self {
            locks: RwLock::new(HashMap::new()),
        }
    }

    /// Number of products with a lock entry.
    pub fn lock_count(&self) -> usize {
        self.locks.read().map(|locks| locks.len()).unwrap_or(0)
    }

    /// Get (or lazily create) the mutex for one product.
    fn lock_for(&self, product_id: ProductId) -> CheckoutResult<Arc<Mutex<()>>> {
        // Fast path: the entry already exists
        {
            let locks = self.locks.read().map_err(|e| {
                CheckoutError::LockCoordinator(format!("Failed to acquire read lock: {}", e))
            })?;
            if let Some(lock) = locks.get(&product_id) {
                return Ok(Arc::clone(lock));
            }
        }

        // Slow path: insert, tolerating a racing insert of the same entry
        let mut locks = self.locks.write().map_err(|e| {
            CheckoutError::LockCoordinator(format!("Failed to acquire write lock: {}", e))
        })?;
        let lock = locks.entry(product_id).or_insert_with(|| Arc::new(Mutex::new(())));
        Ok(Arc::clone(lock))
    }

    /// Acquire every listed product's lock under one deadline.
    ///
    /// Acquisition walks the set in ascending product id order (the set
    /// type guarantees the walk order). All-or-nothing: when the
    /// deadline passes mid-assembly, guards already held are released
    /// before `TimedOut` is returned.
    ///
    /// # Errors
    ///
    /// `Err` only for coordinator faults; contention outcomes are in
    /// the returned [`LockAttempt`].
    pub async fn acquire_all(
        &self,
        product_ids: &BTreeSet<ProductId>,
        timeout: Duration,
    ) -> CheckoutResult<LockAttempt> {
        let deadline = Instant::now() + timeout;
        let mut guards = Vec::with_capacity(product_ids.len());

        for product_id in product_ids {
            let lock = self.lock_for(*product_id)?;
            match timeout_at(deadline, lock.lock_owned()).await {
                Ok(guard) => guards.push(guard),
                Err(_) => {
                    let held = guards.len();
                    drop(guards);
                    warn!(
                        product_id = %product_id,
                        held,
                        requested = product_ids.len(),
                        "Lock set timed out"
                    );
                    return Ok(LockAttempt::TimedOut);
                },
            }
        }

        debug!(count = guards.len(), "Lock set acquired");
        Ok(LockAttempt::Acquired(LockSet { guards }))
    }
}

impl Default for LockCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
