//! Modular foundation utilities shared across ConvoIntel crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: errors and collections (bounded LRU store, ring buffer,
//!   expiring entries)
//! - `runtime`: clock abstraction and bounded-wait locking
//! - `serde`: serde adapters such as `duration_millis`
//! - `observability`: optional tracing (not included by default)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod collections;
#[cfg(feature = "foundation")]
pub mod error;

#[cfg(feature = "serde")]
pub mod utils;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod locking;
#[cfg(feature = "runtime")]
pub mod time;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use collections::{BoundedStore, CacheEntry, RingBuffer};
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult};
#[cfg(feature = "runtime")]
pub use locking::lock_with_timeout;
#[cfg(feature = "serde")]
pub use utils::serde::duration_millis;
#[cfg(feature = "runtime")]
pub use time::{format_duration, Clock, MockClock, SystemClock};
