//! # ConvoIntel Infrastructure
//!
//! In-memory artifact cache for the conversation intelligence pipeline.
//!
//! This crate contains:
//! - The tiered LRU + TTL cache and context compaction (`cache`)
//! - Metrics recording and statistics snapshots (`observability`)
//! - Background expiry sweep and performance logging (`scheduling`)
//! - Settings file loading (`config`)
//! - The [`IntelligenceCache`] facade hosts call into (`service`)
//!
//! ## Architecture
//! - Artifact types and settings come from `convointel-domain`
//! - Collections, clocks and locking helpers come from `convointel-common`

pub mod cache;
pub mod config;
pub mod errors;
pub mod observability;
pub mod scheduling;
pub mod service;

// Re-export commonly used items
pub use cache::{CacheError, CacheTier, TieredCache};
pub use errors::InfraError;
pub use service::{CacheStatus, IntelligenceCache};
