//! Cache constants
//!
//! Defaults for [`CacheSettings`](crate::config::CacheSettings) and the
//! per-entry cost model used by the memory estimate.

// Tier capacities
pub const DEFAULT_CONTEXT_CAPACITY: usize = 50;
pub const DEFAULT_ANALYSIS_CAPACITY: usize = 200;
pub const DEFAULT_PREDICTIONS_CAPACITY: usize = 50;

// Expiry and maintenance cadence
pub const DEFAULT_TTL_SECS: u64 = 2 * 60 * 60;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30 * 60;
pub const DEFAULT_LOG_INTERVAL_SECS: u64 = 5 * 60;
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 250;
pub const DEFAULT_MEMORY_THRESHOLD_BYTES: u64 = 50 * 1024 * 1024;

// Context compaction
pub const DEFAULT_HISTORY_WINDOW: usize = 20;
pub const DEFAULT_TRAJECTORY_CAP: usize = 10;
pub const DEFAULT_TRAJECTORY_RECENT: usize = 5;
pub const DEFAULT_SIGNIFICANCE_THRESHOLD: f64 = 0.3;
pub const DEFAULT_OVERSIZED_CONTEXT_BYTES: usize = 64 * 1024;
pub const DEFAULT_MAX_TURN_CHARS: usize = 2_000;

// Flat per-entry costs for the memory estimate. At the default capacities a
// full cache is estimated at 56.25 MiB, above the default threshold.
pub const CONTEXT_ENTRY_COST_BYTES: u64 = 768 * 1024;
pub const ANALYSIS_ENTRY_COST_BYTES: u64 = 64 * 1024;
pub const PREDICTIONS_ENTRY_COST_BYTES: u64 = 128 * 1024;

/// Samples kept per operation in the latency window
pub const LATENCY_WINDOW_SIZE: usize = 100;

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates that the automatic optimization pass is reachable with the
    /// default settings.
    ///
    /// Assertions:
    /// - Confirms a cache filled to every default capacity is estimated above
    ///   the default memory threshold.
    /// - Confirms a half-full cache stays below it.
    #[test]
    fn test_full_default_cache_crosses_memory_threshold() {
        let full = DEFAULT_CONTEXT_CAPACITY as u64 * CONTEXT_ENTRY_COST_BYTES
            + DEFAULT_ANALYSIS_CAPACITY as u64 * ANALYSIS_ENTRY_COST_BYTES
            + DEFAULT_PREDICTIONS_CAPACITY as u64 * PREDICTIONS_ENTRY_COST_BYTES;

        assert!(full > DEFAULT_MEMORY_THRESHOLD_BYTES);
        assert!(full / 2 < DEFAULT_MEMORY_THRESHOLD_BYTES);
    }
}
