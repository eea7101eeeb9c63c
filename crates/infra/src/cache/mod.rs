//! Tiered artifact cache
//!
//! Three independently bounded LRU tiers (conversation contexts, per-turn
//! analyses and response predictions) share one TTL policy. Contexts are
//! compacted on the way in and may be trimmed again lazily after an
//! optimization pass flags them as oversized.

pub mod compaction;
pub mod error;
pub mod tier;
pub mod tiered;

pub use compaction::ContextCompactor;
pub use error::{CacheError, CacheResult};
pub use tier::CacheTier;
pub use tiered::{OptimizationReport, SweepReport, TieredCache};
