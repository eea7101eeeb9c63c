//! Cache settings and builder
//!
//! Settings are read once at initialization (from code or a settings file)
//! and never change while the cache runs. Durations are written to settings
//! files as whole milliseconds.

use std::time::Duration;

use convointel_common::duration_millis;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::errors::{ConvoIntelError, Result};

/// Settings for the tiered artifact cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Maximum resident conversation contexts
    pub context_capacity: usize,

    /// Maximum resident per-turn analyses
    pub analysis_capacity: usize,

    /// Maximum resident prediction bundles
    pub predictions_capacity: usize,

    /// Maximum entry age before reads treat it as a miss
    #[serde(rename = "ttl_ms", with = "duration_millis")]
    pub ttl: Duration,

    /// Cadence of the expiry sweep task
    #[serde(rename = "sweep_interval_ms", with = "duration_millis")]
    pub sweep_interval: Duration,

    /// Cadence of the performance logging task
    #[serde(rename = "log_interval_ms", with = "duration_millis")]
    pub log_interval: Duration,

    /// Longest wait for a tier lock before the operation fails
    #[serde(rename = "lock_timeout_ms", with = "duration_millis")]
    pub lock_timeout: Duration,

    /// Estimated footprint above which a sweep triggers memory optimization
    pub memory_threshold_bytes: u64,

    pub compaction: CompactionSettings,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            context_capacity: DEFAULT_CONTEXT_CAPACITY,
            analysis_capacity: DEFAULT_ANALYSIS_CAPACITY,
            predictions_capacity: DEFAULT_PREDICTIONS_CAPACITY,
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            log_interval: Duration::from_secs(DEFAULT_LOG_INTERVAL_SECS),
            lock_timeout: Duration::from_millis(DEFAULT_LOCK_TIMEOUT_MS),
            memory_threshold_bytes: DEFAULT_MEMORY_THRESHOLD_BYTES,
            compaction: CompactionSettings::default(),
        }
    }
}

impl CacheSettings {
    /// Create a new settings builder starting from the defaults
    pub fn builder() -> CacheSettingsBuilder {
        CacheSettingsBuilder::default()
    }

    /// Reject settings the cache cannot run with
    ///
    /// # Errors
    ///
    /// Returns [`ConvoIntelError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let capacities = [
            ("context_capacity", self.context_capacity),
            ("analysis_capacity", self.analysis_capacity),
            ("predictions_capacity", self.predictions_capacity),
        ];
        for (field, capacity) in capacities {
            if capacity == 0 {
                return Err(invalid(field, "must be greater than zero"));
            }
        }

        let durations = [
            ("ttl_ms", self.ttl),
            ("sweep_interval_ms", self.sweep_interval),
            ("log_interval_ms", self.log_interval),
            ("lock_timeout_ms", self.lock_timeout),
        ];
        for (field, duration) in durations {
            if duration.is_zero() {
                return Err(invalid(field, "must be greater than zero"));
            }
        }

        if self.memory_threshold_bytes == 0 {
            return Err(invalid("memory_threshold_bytes", "must be greater than zero"));
        }

        self.compaction.validate()
    }
}

/// Parameters of the lossy context compaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompactionSettings {
    /// Most recent turns kept in a context's history
    pub history_window: usize,

    /// Maximum trajectory length after compaction
    pub trajectory_cap: usize,

    /// Newest trajectory points kept verbatim
    pub trajectory_recent: usize,

    /// Minimum distance from the predecessor for an older point to survive
    pub significance_threshold: f64,

    /// Estimated payload above which a context is trimmed on its next read
    pub oversized_context_bytes: usize,

    /// Per-text character budget applied when an oversized context is trimmed
    pub max_turn_chars: usize,
}

impl Default for CompactionSettings {
    fn default() -> Self {
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
            trajectory_cap: DEFAULT_TRAJECTORY_CAP,
            trajectory_recent: DEFAULT_TRAJECTORY_RECENT,
            significance_threshold: DEFAULT_SIGNIFICANCE_THRESHOLD,
            oversized_context_bytes: DEFAULT_OVERSIZED_CONTEXT_BYTES,
            max_turn_chars: DEFAULT_MAX_TURN_CHARS,
        }
    }
}

impl CompactionSettings {
    /// # Errors
    ///
    /// Returns [`ConvoIntelError::Config`] for out-of-range parameters.
    pub fn validate(&self) -> Result<()> {
        if self.history_window == 0 {
            return Err(invalid("compaction.history_window", "must be greater than zero"));
        }
        if self.trajectory_cap == 0 {
            return Err(invalid("compaction.trajectory_cap", "must be greater than zero"));
        }
        if self.trajectory_recent > self.trajectory_cap {
            return Err(invalid(
                "compaction.trajectory_recent",
                "must not exceed compaction.trajectory_cap",
            ));
        }
        if !self.significance_threshold.is_finite() || self.significance_threshold < 0.0 {
            return Err(invalid(
                "compaction.significance_threshold",
                "must be a finite, non-negative distance",
            ));
        }
        if self.oversized_context_bytes == 0 {
            return Err(invalid("compaction.oversized_context_bytes", "must be greater than zero"));
        }
        if self.max_turn_chars == 0 {
            return Err(invalid("compaction.max_turn_chars", "must be greater than zero"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConvoIntelError {
    ConvoIntelError::Config(format!("{field} {reason}"))
}

/// Builder for [`CacheSettings`] with fluent API
#[derive(Debug, Default)]
pub struct CacheSettingsBuilder {
    settings: CacheSettings,
}

impl CacheSettingsBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set all three tier capacities
    pub fn capacities(mut self, context: usize, analysis: usize, predictions: usize) -> Self {
        self.settings.context_capacity = context;
        self.settings.analysis_capacity = analysis;
        self.settings.predictions_capacity = predictions;
        self
    }

    pub fn context_capacity(mut self, capacity: usize) -> Self {
        self.settings.context_capacity = capacity;
        self
    }

    pub fn analysis_capacity(mut self, capacity: usize) -> Self {
        self.settings.analysis_capacity = capacity;
        self
    }

    pub fn predictions_capacity(mut self, capacity: usize) -> Self {
        self.settings.predictions_capacity = capacity;
        self
    }

    /// Set time-to-live for entries
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.settings.ttl = ttl;
        self
    }

    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.settings.sweep_interval = interval;
        self
    }

    pub fn log_interval(mut self, interval: Duration) -> Self {
        self.settings.log_interval = interval;
        self
    }

    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.settings.lock_timeout = timeout;
        self
    }

    pub fn memory_threshold_bytes(mut self, bytes: u64) -> Self {
        self.settings.memory_threshold_bytes = bytes;
        self
    }

    pub fn compaction(mut self, compaction: CompactionSettings) -> Self {
        self.settings.compaction = compaction;
        self
    }

    /// Build the settings without validating them
    pub fn build(self) -> CacheSettings {
        self.settings
    }
}
