//! Conversation context artifacts

use std::mem::size_of;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_label_conversions;

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Counterpart,
}

impl_label_conversions!(Speaker {
    User => "user",
    Counterpart => "counterpart",
});

/// One translated utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: String,
    pub speaker: Speaker,
    pub original_text: String,
    pub translated_text: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(
        id: impl Into<String>,
        speaker: Speaker,
        original_text: impl Into<String>,
        translated_text: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            speaker,
            original_text: original_text.into(),
            translated_text: translated_text.into(),
            timestamp,
        }
    }

    /// Approximate heap plus inline footprint in bytes
    pub fn estimated_bytes(&self) -> usize {
        size_of::<Self>() + self.id.len() + self.original_text.len() + self.translated_text.len()
    }
}

/// A sample on the valence/arousal plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionalPoint {
    /// Negative to positive, in `[-1, 1]`
    pub valence: f64,
    /// Calm to excited, in `[-1, 1]`
    pub arousal: f64,
    pub timestamp: DateTime<Utc>,
}

impl EmotionalPoint {
    /// Create a point, clamping both axes into `[-1, 1]`
    pub fn new(valence: f64, arousal: f64, timestamp: DateTime<Utc>) -> Self {
        Self { valence: valence.clamp(-1.0, 1.0), arousal: arousal.clamp(-1.0, 1.0), timestamp }
    }

    /// Euclidean distance over (valence, arousal)
    pub fn distance(&self, other: &Self) -> f64 {
        (self.valence - other.valence).hypot(self.arousal - other.arousal)
    }
}

/// Accumulated context of one conversation
///
/// `history` and `emotional_trajectory` are ordered oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub conversation_id: String,
    pub history: Vec<ConversationTurn>,
    pub emotional_trajectory: Vec<EmotionalPoint>,
    pub summary: Option<String>,
    pub source_language: String,
    pub target_language: String,
    pub updated_at: DateTime<Utc>,
}

impl ConversationContext {
    /// Empty context for a language pair
    pub fn new(
        conversation_id: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            history: Vec::new(),
            emotional_trajectory: Vec::new(),
            summary: None,
            source_language: source_language.into(),
            target_language: target_language.into(),
            updated_at: Utc::now(),
        }
    }

    /// Approximate footprint in bytes
    ///
    /// Counts string payloads and fixed-size records; allocator overhead and
    /// spare vector capacity are ignored.
    pub fn estimated_bytes(&self) -> usize {
        let turns: usize = self.history.iter().map(ConversationTurn::estimated_bytes).sum();
        let trajectory = self.emotional_trajectory.len() * size_of::<EmotionalPoint>();
        let summary = self.summary.as_ref().map_or(0, String::len);

        size_of::<Self>()
            + self.conversation_id.len()
            + self.source_language.len()
            + self.target_language.len()
            + turns
            + trajectory
            + summary
    }
}
