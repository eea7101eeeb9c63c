//! Conversions from infrastructure errors into the domain error.
//!
//! Each infra error type (`CacheError`, `SchedulerError`) converts into
//! [`InfraError`] next to its definition; this module only holds the newtype.

use convointel_domain::ConvoIntelError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ConvoIntelError);

impl From<InfraError> for ConvoIntelError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ConvoIntelError> for InfraError {
    fn from(value: ConvoIntelError) -> Self {
        InfraError(value)
    }
}
