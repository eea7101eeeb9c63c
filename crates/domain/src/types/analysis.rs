//! Per-turn analysis artifacts

use serde::{Deserialize, Serialize};

/// Result of analysing a single turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnAnalysis {
    pub turn_id: String,
    pub intent: String,
    /// Negative to positive, in `[-1, 1]`
    pub sentiment: f64,
    /// Model confidence, in `[0, 1]`
    pub confidence: f64,
    #[serde(default)]
    pub key_phrases: Vec<String>,
    /// Producer-specific fields the cache never inspects
    #[serde(default)]
    pub attributes: serde_json::Value,
}

impl TurnAnalysis {
    pub fn new(turn_id: impl Into<String>, intent: impl Into<String>) -> Self {
        Self {
            turn_id: turn_id.into(),
            intent: intent.into(),
            sentiment: 0.0,
            confidence: 0.0,
            key_phrases: Vec::new(),
            attributes: serde_json::Value::Null,
        }
    }
}
