//! # ConvoIntel Domain
//!
//! Artifact types and settings for the ConvoIntel cache.
//!
//! This crate contains:
//! - Artifact types (conversation context, turn analysis, prediction bundles)
//! - Cache settings with validation
//! - Domain error type and `Result` alias
//! - Default constants
//!
//! ## Architecture
//! - Depends only on the serde adapters of `convointel-common`
//! - Pure data structures; no I/O and no async

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
