//! Scheduler error types

use std::time::Duration;

use convointel_domain::ConvoIntelError;
use thiserror::Error;

use crate::errors::InfraError;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Scheduler is already running
    #[error("Scheduler already running")]
    AlreadyRunning,

    /// Scheduler was stopped and cannot be restarted
    #[error("Scheduler has been disposed")]
    Disposed,

    /// No tokio runtime to spawn maintenance tasks on
    #[error("No async runtime available to start maintenance tasks")]
    NoRuntime,

    /// Operation timed out
    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Task join failed
    #[error("Task join failed: {0}")]
    TaskJoinFailed(#[from] tokio::task::JoinError),
}

impl From<SchedulerError> for InfraError {
    fn from(err: SchedulerError) -> Self {
        let convo_err = match err {
            SchedulerError::AlreadyRunning | SchedulerError::Disposed => {
                ConvoIntelError::InvalidInput(err.to_string())
            }
            _ => ConvoIntelError::Scheduler(err.to_string()),
        };
        InfraError(convo_err)
    }
}

impl From<SchedulerError> for ConvoIntelError {
    fn from(err: SchedulerError) -> Self {
        InfraError::from(err).into()
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
