//! Cache error types

use convointel_common::CommonError;
use convointel_domain::ConvoIntelError;
use thiserror::Error;

use crate::cache::CacheTier;
use crate::errors::InfraError;

/// Cache-specific errors
#[derive(Debug, Error)]
pub enum CacheError {
    /// Settings rejected at construction
    #[error("Invalid cache settings: {0}")]
    InvalidSettings(#[source] ConvoIntelError),

    /// A tier store could not be used
    #[error("{tier} tier unavailable: {source}")]
    Tier {
        /// Tier whose store was unavailable
        tier: CacheTier,
        /// Underlying store failure
        #[source]
        source: CommonError,
    },
}

impl CacheError {
    /// Wrap a store failure with the tier it happened on
    pub fn tier(tier: CacheTier, source: CommonError) -> Self {
        Self::Tier { tier, source }
    }
}

impl From<CacheError> for InfraError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::InvalidSettings(inner) => InfraError(inner),
            CacheError::Tier { .. } => InfraError(ConvoIntelError::Cache(err.to_string())),
        }
    }
}

impl From<CacheError> for ConvoIntelError {
    fn from(err: CacheError) -> Self {
        InfraError::from(err).into()
    }
}

/// Convenience type alias for cache operations
pub type CacheResult<T> = Result<T, CacheError>;
