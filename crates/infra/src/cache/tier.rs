//! Tier identifiers

use convointel_domain::impl_label_conversions;
use serde::{Deserialize, Serialize};

/// One of the three independently bounded caches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheTier {
    Context,
    Analysis,
    Predictions,
}

impl_label_conversions!(CacheTier {
    Context => "context",
    Analysis => "analysis",
    Predictions => "predictions",
});

impl CacheTier {
    /// Every tier, in reporting order
    pub const ALL: [CacheTier; 3] = [Self::Context, Self::Analysis, Self::Predictions];

    /// Dense index for per-tier arrays
    pub const fn index(self) -> usize {
        match self {
            Self::Context => 0,
            Self::Analysis => 1,
            Self::Predictions => 2,
        }
    }

    /// Latency operation name for reads from this tier
    pub const fn get_operation(self) -> &'static str {
        match self {
            Self::Context => "context.get",
            Self::Analysis => "analysis.get",
            Self::Predictions => "predictions.get",
        }
    }

    /// Latency operation name for writes to this tier
    pub const fn put_operation(self) -> &'static str {
        match self {
            Self::Context => "context.put",
            Self::Analysis => "analysis.put",
            Self::Predictions => "predictions.put",
        }
    }
}
