//! Specialized data structures
//!
//! This module provides the containers the artifact cache is built from:
//! - **[`bounded_store`]**: Fixed-capacity store with LRU eviction
//! - **[`expiring`]**: Entries stamped with their creation instant
//! - **[`ring_buffer`]**: Fixed-size sample window
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Instant;
//!
//! use convointel_common::collections::{BoundedStore, CacheEntry, RingBuffer};
//!
//! let mut store = BoundedStore::try_new(50).expect("non-zero capacity");
//! store.put("conversation-1".to_string(), CacheEntry::new(42, Instant::now()));
//!
//! let mut latencies = RingBuffer::new(100);
//! latencies.push(120_u64);
//! ```

pub mod bounded_store;
pub mod expiring;
pub mod ring_buffer;

// Re-export commonly used types
pub use bounded_store::BoundedStore;
pub use expiring::CacheEntry;
pub use ring_buffer::RingBuffer;
