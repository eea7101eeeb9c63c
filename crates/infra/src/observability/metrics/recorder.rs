//! Aggregate metrics recorder shared by the tiers and the scheduler

use std::sync::atomic::{AtomicU64, Ordering};

use crate::cache::CacheTier;
use crate::observability::metrics::{LatencyWindows, TierCounters, TierCounts};
use crate::observability::MetricsResult;

/// Thread-safe recorder for every cache metric
///
/// Counters only grow. Derived values (hit rate, mean latency) are computed
/// on demand and never stored.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    tiers: [TierCounters; 3],
    latency: LatencyWindows,
    optimization_runs: AtomicU64,
    bytes_saved: AtomicU64,
}

impl MetricsRecorder {
    /// Recorder with zeroed counters and empty latency windows
    pub fn new() -> Self {
        Self::default()
    }

    fn tier(&self, tier: CacheTier) -> &TierCounters {
        &self.tiers[tier.index()]
    }

    /// Count a hit on `tier`
    pub fn record_hit(&self, tier: CacheTier) -> MetricsResult<()> {
        self.tier(tier).record_hit()
    }

    /// Count a miss on `tier`
    pub fn record_miss(&self, tier: CacheTier) -> MetricsResult<()> {
        self.tier(tier).record_miss()
    }

    /// Count a write to `tier`
    pub fn record_write(&self, tier: CacheTier) -> MetricsResult<()> {
        self.tier(tier).record_write()
    }

    /// Count an LRU eviction from `tier`
    pub fn record_eviction(&self, tier: CacheTier) -> MetricsResult<()> {
        self.tier(tier).record_eviction()
    }

    /// Count `count` entries removed from `tier` by a sweep
    pub fn record_expirations(&self, tier: CacheTier, count: u64) -> MetricsResult<()> {
        self.tier(tier).record_expirations(count)
    }

    /// Record one latency sample in microseconds
    pub fn record_latency(&self, operation: &str, micros: u64) -> MetricsResult<()> {
        self.latency.record(operation, micros)
    }

    /// Record a completed memory optimization pass
    pub fn record_memory_optimization(&self, bytes_saved: u64) -> MetricsResult<()> {
        self.optimization_runs.fetch_add(1, Ordering::Relaxed);
        self.bytes_saved.fetch_add(bytes_saved, Ordering::Relaxed);
        Ok(())
    }

    /// Record bytes reclaimed outside a full optimization pass
    pub fn record_bytes_saved(&self, bytes_saved: u64) -> MetricsResult<()> {
        self.bytes_saved.fetch_add(bytes_saved, Ordering::Relaxed);
        Ok(())
    }

    /// `hits / (hits + misses)` for `tier`, 0.0 with no observations
    pub fn hit_rate(&self, tier: CacheTier) -> f64 {
        self.tier(tier).hit_rate()
    }

    /// Mean of the recent samples for `operation` in milliseconds
    ///
    /// Returns 0.0 if nothing was recorded for the operation.
    pub fn average_latency_ms(&self, operation: &str) -> f64 {
        self.latency.average_ms(operation).unwrap_or(0.0)
    }

    /// Samples currently held for `operation`
    pub fn latency_samples(&self, operation: &str) -> usize {
        self.latency.sample_count(operation)
    }

    /// Snapshot of the counters for `tier`
    pub fn counts(&self, tier: CacheTier) -> TierCounts {
        self.tier(tier).snapshot()
    }

    /// Completed optimization passes
    pub fn optimization_runs(&self) -> u64 {
        self.optimization_runs.load(Ordering::Relaxed)
    }

    /// Bytes reclaimed so far
    pub fn bytes_saved(&self) -> u64 {
        self.bytes_saved.load(Ordering::Relaxed)
    }
}
