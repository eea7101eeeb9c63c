//! Artifact types held by the cache
//!
//! The cache treats these as opaque payloads apart from
//! [`ConversationContext`], whose history and emotional trajectory are
//! compacted before storage.

pub mod analysis;
pub mod conversation;
pub mod prediction;

pub use analysis::TurnAnalysis;
pub use conversation::{ConversationContext, ConversationTurn, EmotionalPoint, Speaker};
pub use prediction::{PredictedResponse, PredictionBundle};

/// Opaque artifact identifier; only equality matters
pub type CacheKey = String;
