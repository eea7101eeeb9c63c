//! Cache statistics snapshots and the periodic performance log line

use serde::Serialize;
use tracing::info;

use crate::cache::CacheTier;

/// Point-in-time statistics for one tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierStatistics {
    /// Tier these figures describe
    pub tier: CacheTier,
    /// Resident entries, including expired ones not yet swept
    pub size: usize,
    /// Configured entry bound
    pub capacity: usize,
    /// Reads that returned a live entry
    pub hits: u64,
    /// Reads that found nothing or an expired entry
    pub misses: u64,
    /// Successful puts
    pub writes: u64,
    /// Entries displaced by capacity
    pub evictions: u64,
    /// Entries removed by sweeps
    pub expirations: u64,
    /// `hits / (hits + misses)` at snapshot time
    pub hit_rate: f64,
    /// Mean of the recent get samples
    pub avg_get_latency_ms: f64,
    /// Mean of the recent put samples
    pub avg_put_latency_ms: f64,
}

impl TierStatistics {
    /// Calculate miss rate (misses / total accesses)
    pub fn miss_rate(&self) -> f64 {
        if self.total_accesses() == 0 {
            0.0
        } else {
            1.0 - self.hit_rate
        }
    }

    /// Calculate fill percentage (size / capacity)
    pub fn fill_percentage(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.size as f64 / self.capacity as f64
        }
    }

    /// Total number of access operations (hits + misses)
    pub fn total_accesses(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Statistics for every tier plus cache-wide figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStatistics {
    /// Conversation contexts
    pub context: TierStatistics,
    /// Turn analyses
    pub analysis: TierStatistics,
    /// Prediction bundles
    pub predictions: TierStatistics,
    /// Flat per-entry estimate, not a measurement
    pub estimated_memory_bytes: u64,
    /// Completed optimization passes
    pub optimization_runs: u64,
    /// Bytes reclaimed by optimization passes and lazy trims
    pub bytes_saved: u64,
}

impl CacheStatistics {
    /// Per-tier statistics in reporting order
    pub fn tiers(&self) -> [&TierStatistics; 3] {
        [&self.context, &self.analysis, &self.predictions]
    }

    /// Statistics for a single tier
    pub fn tier(&self, tier: CacheTier) -> &TierStatistics {
        match tier {
            CacheTier::Context => &self.context,
            CacheTier::Analysis => &self.analysis,
            CacheTier::Predictions => &self.predictions,
        }
    }

    /// Resident entries across every tier
    pub fn total_entries(&self) -> usize {
        self.tiers().iter().map(|tier| tier.size).sum()
    }
}

/// Emit one `info!` event per tier plus a summary
pub fn log_performance_snapshot(stats: &CacheStatistics) {
    for tier in stats.tiers() {
        info!(
            tier = %tier.tier,
            size = tier.size,
            capacity = tier.capacity,
            hit_rate = tier.hit_rate,
            evictions = tier.evictions,
            avg_get_ms = tier.avg_get_latency_ms,
            avg_put_ms = tier.avg_put_latency_ms,
            "Cache tier performance"
        );
    }

    info!(
        total_entries = stats.total_entries(),
        estimated_memory_bytes = stats.estimated_memory_bytes,
        optimization_runs = stats.optimization_runs,
        bytes_saved = stats.bytes_saved,
        "Cache performance snapshot"
    );
}
