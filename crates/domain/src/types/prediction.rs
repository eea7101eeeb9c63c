//! Predictive insight artifacts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Candidate next response with its estimated probability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedResponse {
    pub text: String,
    pub probability: f64,
}

/// Likely next responses for a conversation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionBundle {
    pub context_key: String,
    pub responses: Vec<PredictedResponse>,
    pub generated_at: DateTime<Utc>,
}

impl PredictionBundle {
    pub fn new(context_key: impl Into<String>, responses: Vec<PredictedResponse>) -> Self {
        Self { context_key: context_key.into(), responses, generated_at: Utc::now() }
    }

    /// Highest-probability candidate, if any
    pub fn most_likely(&self) -> Option<&PredictedResponse> {
        self.responses.iter().max_by(|a, b| a.probability.total_cmp(&b.probability))
    }
}
