//! Cache observability: metrics recording and statistics snapshots
//!
//! ## Design Principles
//!
//! 1. **Atomic counters**: per-tier hit/miss/write/eviction/expiration counts
//!    are lock-free and monotonic.
//!
//! 2. **Bounded latency windows**: the most recent samples per operation in a
//!    ring buffer; a new sample drops only the single oldest one.
//!
//! 3. **Poison recovery**: the latency map lock recovers a poisoned mutex and
//!    keeps the recovered data.
//!
//! 4. **Result returns**: record methods return `MetricsResult<()>`. Callers
//!    log failures and carry on; a metric is never worth failing a cache
//!    operation.
//!
//! ```rust
//! use convointel_infra::cache::CacheTier;
//! use convointel_infra::observability::MetricsRecorder;
//!
//! let metrics = MetricsRecorder::new();
//! if let Err(e) = metrics.record_hit(CacheTier::Context) {
//!     tracing::warn!("Failed to record metric: {}", e);
//! }
//! assert_eq!(metrics.hit_rate(CacheTier::Context), 1.0);
//! ```

pub mod metrics;
pub mod stats;

pub use metrics::{LatencyWindows, MetricsRecorder, TierCounters, TierCounts};
pub use stats::{log_performance_snapshot, CacheStatistics, TierStatistics};

/// Metrics error type
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Empty data set - cannot calculate aggregate metric
    #[error("Empty data: cannot calculate {metric} for '{operation}'")]
    EmptyData {
        /// Aggregate that failed (e.g. "average")
        metric: &'static str,
        /// Operation name the aggregate was requested for
        operation: String,
    },

    /// A counter would wrap
    #[error("Counter overflow for metric '{metric}'")]
    Overflow {
        /// Metric name
        metric: &'static str,
    },
}

/// Result type for metrics operations
pub type MetricsResult<T> = Result<T, MetricsError>;

/// Log a failed metric write and carry on
pub(crate) fn log_metric(result: MetricsResult<()>, metric: &'static str) {
    if let Err(err) = result {
        tracing::warn!(metric = metric, error = ?err, "Failed to record cache metric");
    }
}
