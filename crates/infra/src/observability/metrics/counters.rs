//! Per-tier cache counters
//!
//! ## Design
//! - **SeqCst ordering** for hits and misses, which feed the derived hit rate
//! - **Relaxed ordering** for independent counters (writes, evictions,
//!   expirations)
//! - **No locking needed** - plain atomic counters, monotonic
//! - **MetricsResult returns** so an overflowing counter is reported rather
//!   than silently wrapped

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::observability::{MetricsError, MetricsResult};

/// Counters for a single tier
#[derive(Debug, Default)]
pub struct TierCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

/// Point-in-time copy of [`TierCounters`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    /// Reads served from the tier
    pub hits: u64,
    /// Reads that missed
    pub misses: u64,
    /// Successful puts
    pub writes: u64,
    /// Capacity evictions
    pub evictions: u64,
    /// Entries removed by sweeps
    pub expirations: u64,
}

impl TierCounters {
    /// Zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a read that returned a fresh entry
    pub fn record_hit(&self) -> MetricsResult<()> {
        // SeqCst for consistency with hit_rate calculation
        increment(&self.hits, 1, Ordering::SeqCst, "hits")
    }

    /// Record a read that found nothing fresh
    pub fn record_miss(&self) -> MetricsResult<()> {
        // SeqCst for consistency with hit_rate calculation
        increment(&self.misses, 1, Ordering::SeqCst, "misses")
    }

    /// Count a write
    pub fn record_write(&self) -> MetricsResult<()> {
        increment(&self.writes, 1, Ordering::Relaxed, "writes")
    }

    /// Count an eviction
    pub fn record_eviction(&self) -> MetricsResult<()> {
        increment(&self.evictions, 1, Ordering::Relaxed, "evictions")
    }

    /// Record `count` entries removed by an expiry sweep
    pub fn record_expirations(&self, count: u64) -> MetricsResult<()> {
        increment(&self.expirations, count, Ordering::Relaxed, "expirations")
    }

    /// Fraction of reads that hit, in `[0, 1]`
    ///
    /// Returns 0.0 if no reads have been recorded.
    pub fn hit_rate(&self) -> f64 {
        // SeqCst for consistent snapshot of both counters
        let hits = self.hits.load(Ordering::SeqCst);
        let misses = self.misses.load(Ordering::SeqCst);

        let total = hits + misses;
        if total == 0 {
            return 0.0;
        }

        hits as f64 / total as f64
    }

    /// Copy the current values
    pub fn snapshot(&self) -> TierCounts {
        TierCounts {
            hits: self.hits.load(Ordering::SeqCst),
            misses: self.misses.load(Ordering::SeqCst),
            writes: self.writes.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
        }
    }
}

fn increment(
    counter: &AtomicU64,
    amount: u64,
    ordering: Ordering,
    metric: &'static str,
) -> MetricsResult<()> {
    counter
        .fetch_update(ordering, Ordering::Relaxed, |current| current.checked_add(amount))
        .map(|_| ())
        .map_err(|_| MetricsError::Overflow { metric })
}
