//! Metrics collection modules
//!
//! Thread-safe metrics for the cache tiers.

pub mod counters;
pub mod latency;
pub mod recorder;

pub use counters::{TierCounters, TierCounts};
pub use latency::LatencyWindows;
pub use recorder::MetricsRecorder;
