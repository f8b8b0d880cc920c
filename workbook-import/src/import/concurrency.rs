//! Row concurrency limiter
//!
//! Every row of a sheet is dispatched at once; the limiter optionally caps
//! how many row pipelines talk to the lookup at the same time.

use log::debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Semaphore-based limiter for in-flight row pipelines
#[derive(Debug, Clone)]
pub struct RowLimiter {
    semaphore: Option<Arc<Semaphore>>,
    max_concurrent_rows: usize,
    rows_acquired: Arc<AtomicU64>,
    rows_waited: Arc<AtomicU64>,
}

impl RowLimiter {
    /// Limit to `max_concurrent_rows` pipelines; 0 means unbounded
    pub fn new(max_concurrent_rows: usize) -> Self {
        let semaphore = if max_concurrent_rows > 0 {
            Some(Arc::new(Semaphore::new(max_concurrent_rows)))
        } else {
            None
        };

        Self {
            semaphore,
            max_concurrent_rows,
            rows_acquired: Arc::new(AtomicU64::new(0)),
            rows_waited: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(0)
    }

    /// Wait for a slot. The returned permit frees the slot when dropped;
    /// an unbounded limiter hands out no permit at all.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        self.rows_acquired.fetch_add(1, Ordering::Relaxed);
        let semaphore = self.semaphore.as_ref()?;

        if semaphore.available_permits() == 0 {
            self.rows_waited.fetch_add(1, Ordering::Relaxed);
            debug!(
                "Row limiter: waiting for a slot ({} rows in flight)",
                self.max_concurrent_rows
            );
        }

        // The semaphore is never closed, so acquiring only fails on shutdown
        semaphore.clone().acquire_owned().await.ok()
    }

    pub fn is_bounded(&self) -> bool {
        self.semaphore.is_some()
    }

    /// Rows that can start right now
    pub fn available_slots(&self) -> usize {
        match &self.semaphore {
            Some(semaphore) => semaphore.available_permits(),
            None => usize::MAX,
        }
    }

    pub fn stats(&self) -> RowLimiterStats {
        RowLimiterStats {
            max_concurrent_rows: self.max_concurrent_rows,
            rows_acquired: self.rows_acquired.load(Ordering::Relaxed),
            rows_waited: self.rows_waited.load(Ordering::Relaxed),
        }
    }
}

impl Default for RowLimiter {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Statistics for the row limiter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLimiterStats {
    /// Configured cap, 0 when unbounded
    pub max_concurrent_rows: usize,
    /// Row pipelines that asked for a slot
    pub rows_acquired: u64,
    /// Row pipelines that had to wait for one
    pub rows_waited: u64,
}
