//! Shared helper modules
//!
//! - **[`serde`]**: serde adapters for std types

pub mod serde;

pub use self::serde::duration_millis;
