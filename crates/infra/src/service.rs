//! `IntelligenceCache`: the facade hosts talk to
//!
//! Every operation is total. Failures inside the cache (a tier lock that
//! cannot be taken, a scheduler that cannot start) are logged and surface as a
//! miss or a dropped write. Construct one instance at startup and share it
//! through an `Arc`.

use std::path::PathBuf;
use std::sync::Arc;

use convointel_common::{Clock, SystemClock};
use convointel_domain::{
    CacheSettings, ConversationContext, PredictionBundle, Result, TurnAnalysis,
};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::cache::{CacheError, CacheResult, OptimizationReport, TieredCache};
use crate::config::load_from_file;
use crate::observability::CacheStatistics;
use crate::scheduling::{run_sweep_cycle, MaintenanceConfig, MaintenanceScheduler, SweepCycleReport};

/// Lifecycle of an [`IntelligenceCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    /// Constructed; operations work but nothing runs in the background
    Idle,
    /// Maintenance tasks are running
    Running,
    /// Initialization failed; gets miss and puts are dropped
    PassThrough,
    /// Disposed; every call is ignored
    Disposed,
}

/// Process-wide artifact cache
pub struct IntelligenceCache<C: Clock = SystemClock> {
    cache: Arc<TieredCache<C>>,
    scheduler: MaintenanceScheduler<C>,
    status: Mutex<CacheStatus>,
}

impl IntelligenceCache<SystemClock> {
    /// Build a cache measuring entry age with the system clock
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidSettings`] if `settings` fail validation.
    pub fn new(settings: CacheSettings) -> CacheResult<Self> {
        Self::with_clock(settings, SystemClock)
    }

    /// Build from a settings file, or from the first file found by
    /// [`probe_config_paths`](crate::config::probe_config_paths)
    ///
    /// # Errors
    ///
    /// Returns the loader's error if the file cannot be read, parsed or
    /// validated.
    pub fn from_config_file(path: Option<PathBuf>) -> Result<Self> {
        let settings = load_from_file(path)?;
        Ok(Self::new(settings)?)
    }
}

impl<C: Clock> IntelligenceCache<C> {
    /// Build a cache measuring entry age with `clock`
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidSettings`] if `settings` fail validation.
    pub fn with_clock(settings: CacheSettings, clock: C) -> CacheResult<Self> {
        let config = MaintenanceConfig::from(&settings);
        let cache = Arc::new(TieredCache::with_clock(settings, clock)?);
        let scheduler = MaintenanceScheduler::new(Arc::clone(&cache), config);

        Ok(Self { cache, scheduler, status: Mutex::new(CacheStatus::Idle) })
    }

    /// Current lifecycle state
    pub fn status(&self) -> CacheStatus {
        *self.status.lock()
    }

    /// Settings the cache was built with
    pub fn settings(&self) -> &CacheSettings {
        self.cache.settings()
    }

    /// Start background maintenance
    ///
    /// Idempotent. If the tasks cannot start the cache switches to
    /// pass-through mode instead of failing.
    #[instrument(skip(self))]
    pub fn initialize(&self) {
        let mut status = self.status.lock();
        match *status {
            CacheStatus::Idle => {}
            CacheStatus::Running | CacheStatus::PassThrough => {
                debug!(status = ?*status, "Cache already initialized");
                return;
            }
            CacheStatus::Disposed => {
                debug!("Ignoring initialize after dispose");
                return;
            }
        }

        match self.scheduler.start() {
            Ok(()) => {
                *status = CacheStatus::Running;
                let settings = self.cache.settings();
                info!(
                    context_capacity = settings.context_capacity,
                    analysis_capacity = settings.analysis_capacity,
                    predictions_capacity = settings.predictions_capacity,
                    ttl = ?settings.ttl,
                    "Intelligence cache ready"
                );
            }
            Err(err) => {
                *status = CacheStatus::PassThrough;
                warn!(error = %err, "Intelligence cache failed to initialize; running in pass-through mode");
            }
        }
    }

    /// Cached context for conversation `id`, or `None` on a miss
    pub fn get_optimized_context(&self, id: &str) -> Option<ConversationContext> {
        self.read("get_optimized_context", || self.cache.get_context(id))
    }

    /// Compact and cache the context of conversation `id`
    pub fn cache_optimized_context(&self, id: &str, context: ConversationContext) {
        self.write("cache_optimized_context", || self.cache.put_context(id, context));
    }

    /// Cached analysis for turn `id`, or `None` on a miss
    pub fn get_cached_analysis(&self, id: &str) -> Option<TurnAnalysis> {
        self.read("get_cached_analysis", || self.cache.get_analysis(id))
    }

    /// Cache the analysis of turn `id`
    pub fn cache_analysis(&self, id: &str, analysis: TurnAnalysis) {
        self.write("cache_analysis", || self.cache.put_analysis(id, analysis));
    }

    /// Cached predictions for `key`, or `None` on a miss
    pub fn get_cached_predictions(&self, key: &str) -> Option<PredictionBundle> {
        self.read("get_cached_predictions", || self.cache.get_predictions(key))
    }

    /// Cache the prediction bundle for `key`
    pub fn cache_predictions(&self, key: &str, bundle: PredictionBundle) {
        self.write("cache_predictions", || self.cache.put_predictions(key, bundle));
    }

    /// Run the memory optimization pass now
    ///
    /// Safe to call while a sweep is running; calling it repeatedly is
    /// harmless.
    pub fn optimize_memory_usage(&self) -> Option<OptimizationReport> {
        if !self.accepts_calls("optimize_memory_usage") {
            return None;
        }
        self.cache
            .optimize_memory()
            .map_err(|err| warn!(error = %err, "Memory optimization failed"))
            .ok()
    }

    /// Sweep expired entries now instead of waiting for the next tick
    pub fn run_sweep_now(&self) -> Option<SweepCycleReport> {
        if !self.accepts_calls("run_sweep_now") {
            return None;
        }
        Some(run_sweep_cycle(&self.cache, self.cache.settings().memory_threshold_bytes))
    }

    /// Per-tier sizes, hit rates and the memory estimate
    pub fn get_cache_statistics(&self) -> Option<CacheStatistics> {
        if !self.accepts_calls("get_cache_statistics") {
            return None;
        }
        self.cache
            .statistics()
            .map_err(|err| warn!(error = %err, "Could not collect cache statistics"))
            .ok()
    }

    /// Drop every entry from every tier
    pub fn clear_all_caches(&self) {
        if !self.accepts_calls("clear_all_caches") {
            return;
        }
        if let Err(err) = self.cache.clear_all() {
            warn!(error = %err, "Failed to clear every cache tier");
        }
    }

    /// Stop maintenance and drop every entry
    ///
    /// The background tasks are cancelled and awaited before the tiers are
    /// cleared. Later calls are ignored.
    #[instrument(skip(self))]
    pub async fn dispose(&self) {
        {
            let mut status = self.status.lock();
            if *status == CacheStatus::Disposed {
                debug!("Cache already disposed");
                return;
            }
            *status = CacheStatus::Disposed;
        }

        if let Err(err) = self.scheduler.stop().await {
            warn!(error = %err, "Maintenance tasks did not stop cleanly");
        }
        if let Err(err) = self.cache.clear_all() {
            warn!(error = %err, "Failed to clear cache tiers on dispose");
        }

        info!("Intelligence cache disposed");
    }

    fn accepts_calls(&self, operation: &'static str) -> bool {
        match self.status() {
            CacheStatus::Idle | CacheStatus::Running => true,
            CacheStatus::PassThrough => false,
            CacheStatus::Disposed => {
                debug!(operation, "Ignoring call after dispose");
                false
            }
        }
    }

    fn read<T>(
        &self,
        operation: &'static str,
        lookup: impl FnOnce() -> CacheResult<Option<T>>,
    ) -> Option<T> {
        if !self.accepts_calls(operation) {
            return None;
        }
        lookup().unwrap_or_else(|err| {
            log_failure(operation, &err);
            None
        })
    }

    fn write(&self, operation: &'static str, store: impl FnOnce() -> CacheResult<()>) {
        if !self.accepts_calls(operation) {
            return;
        }
        if let Err(err) = store() {
            log_failure(operation, &err);
        }
    }
}

fn log_failure(operation: &'static str, err: &CacheError) {
    warn!(operation, error = %err, "Cache operation failed; continuing without cache");
}
