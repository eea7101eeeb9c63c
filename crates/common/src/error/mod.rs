//! Common error types shared by the ConvoIntel crates
//!
//! [`CommonError`] covers the failures raised by the shared runtime helpers.
//! Crate-specific errors wrap it rather than duplicating its variants:
//!
//! ```rust,ignore
//! #[derive(Debug, Error)]
//! pub enum TierError {
//!     #[error("{tier} tier unavailable: {source}")]
//!     Unavailable { tier: CacheTier, #[source] source: CommonError },
//! }
//! ```

use std::fmt;
use std::time::Duration;

/// Standard result type using CommonError
pub type CommonResult<T> = Result<T, CommonError>;

/// Failures raised by the shared runtime helpers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// A lock was still held elsewhere when the wait window elapsed
    Lock {
        /// Name of the guarded resource
        resource: String,
        /// How long the caller waited
        timeout: Duration,
    },
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lock { resource, timeout } => {
                write!(f, "Lock error for '{}': not acquired within {:?}", resource, timeout)
            }
        }
    }
}

impl std::error::Error for CommonError {}

impl CommonError {
    /// Create a lock error for a specific resource
    pub fn lock<R: Into<String>>(resource: R, timeout: Duration) -> Self {
        Self::Lock { resource: resource.into(), timeout }
    }
}
