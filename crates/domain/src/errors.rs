//! Error types used throughout the workspace

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for ConvoIntel
///
/// Serializable so it can cross an IPC boundary to an embedding host.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ConvoIntelError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Scheduler error: {0}")]
    Scheduler(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for ConvoIntel operations
pub type Result<T> = std::result::Result<T, ConvoIntelError>;
