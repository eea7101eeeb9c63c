//! Three independently bounded LRU tiers with shared TTL policy
//!
//! Each tier's store sits behind its own mutex, acquired with a bounded wait.
//! Reads never remove data: an expired entry is reported as a miss but stays
//! resident, still counted toward capacity, until a sweep removes it. Between
//! sweeps a tier can therefore hold stale entries that push out fresh ones.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

use convointel_common::{lock_with_timeout, BoundedStore, CacheEntry, Clock, SystemClock};
use convointel_domain::constants::{
    ANALYSIS_ENTRY_COST_BYTES, CONTEXT_ENTRY_COST_BYTES, PREDICTIONS_ENTRY_COST_BYTES,
};
use convointel_domain::{
    CacheKey, CacheSettings, ConversationContext, PredictionBundle, TurnAnalysis,
};
use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::cache::compaction::ContextCompactor;
use crate::cache::error::{CacheError, CacheResult};
use crate::cache::CacheTier;
use crate::observability::{log_metric, CacheStatistics, MetricsRecorder, TierStatistics};

type Store<T> = BoundedStore<CacheKey, CacheEntry<T>>;
type Tier<T> = Mutex<Store<T>>;

/// Entries removed by one sweep, per tier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Expired contexts removed
    pub context: usize,
    /// Expired analyses removed
    pub analysis: usize,
    /// Expired prediction bundles removed
    pub predictions: usize,
    /// Tiers whose lock could not be taken; they are retried next sweep
    pub skipped: Vec<CacheTier>,
}

impl SweepReport {
    /// Entries removed from `tier`
    pub fn removed(&self, tier: CacheTier) -> usize {
        match tier {
            CacheTier::Context => self.context,
            CacheTier::Analysis => self.analysis,
            CacheTier::Predictions => self.predictions,
        }
    }

    /// Entries removed across all tiers
    pub fn total(&self) -> usize {
        self.context + self.analysis + self.predictions
    }

    fn set(&mut self, tier: CacheTier, removed: usize) {
        match tier {
            CacheTier::Context => self.context = removed,
            CacheTier::Analysis => self.analysis = removed,
            CacheTier::Predictions => self.predictions = removed,
        }
    }
}

/// Outcome of one memory optimization pass over the context tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OptimizationReport {
    /// Contexts shrunk by re-compaction
    pub compacted: usize,
    /// Contexts newly flagged for trimming on their next read
    pub marked: usize,
    /// Bytes reclaimed by re-compaction during the pass
    pub bytes_saved: usize,
}

/// Tiered artifact cache
///
/// `C` supplies the instants entry ages are measured against; tests swap in a
/// [`MockClock`](convointel_common::MockClock).
pub struct TieredCache<C: Clock = SystemClock> {
    context: Tier<ConversationContext>,
    analysis: Tier<TurnAnalysis>,
    predictions: Tier<PredictionBundle>,
    settings: CacheSettings,
    compactor: ContextCompactor,
    metrics: Arc<MetricsRecorder>,
    clock: C,
}

impl TieredCache<SystemClock> {
    /// Create a cache measuring entry age with the system clock
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidSettings`] if `settings` fail validation.
    pub fn new(settings: CacheSettings) -> CacheResult<Self> {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> TieredCache<C> {
    /// Create a cache measuring entry age with `clock`
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidSettings`] if `settings` fail validation.
    pub fn with_clock(settings: CacheSettings, clock: C) -> CacheResult<Self> {
        settings.validate().map_err(CacheError::InvalidSettings)?;

        Ok(Self {
            context: Mutex::new(Store::new(capacity(settings.context_capacity)?)),
            analysis: Mutex::new(Store::new(capacity(settings.analysis_capacity)?)),
            predictions: Mutex::new(Store::new(capacity(settings.predictions_capacity)?)),
            compactor: ContextCompactor::new(settings.compaction.clone()),
            metrics: Arc::new(MetricsRecorder::new()),
            settings,
            clock,
        })
    }

    /// Settings the cache was built with
    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Recorder shared with anything reporting on this cache
    pub fn metrics(&self) -> &Arc<MetricsRecorder> {
        &self.metrics
    }

    // ------------------------------------------------------------------
    // Context tier
    // ------------------------------------------------------------------

    /// Fresh context for `id`, trimming it first if it was flagged oversized
    pub fn get_context(&self, id: &str) -> CacheResult<Option<ConversationContext>> {
        let compactor = &self.compactor;
        let metrics = &self.metrics;

        self.get_from(CacheTier::Context, &self.context, id, |entry| {
            if entry.take_reoptimization_flag() {
                let saved = compactor.trim_oversized(entry.value_mut());
                debug!(bytes_saved = saved, "Trimmed oversized context on read");
                log_metric(metrics.record_bytes_saved(saved as u64), "cache.context.trim");
            }
        })
    }

    /// Compact `context` and store it under `id`
    pub fn put_context(&self, id: impl Into<CacheKey>, mut context: ConversationContext) -> CacheResult<()> {
        let saved = self.compactor.compact(&mut context);
        if saved > 0 {
            debug!(bytes_saved = saved, "Compacted context before caching");
        }
        self.put_into(CacheTier::Context, &self.context, id.into(), context)
    }

    // ------------------------------------------------------------------
    // Analysis tier
    // ------------------------------------------------------------------

    /// Fresh analysis for turn `id`
    pub fn get_analysis(&self, id: &str) -> CacheResult<Option<TurnAnalysis>> {
        self.get_from(CacheTier::Analysis, &self.analysis, id, |_| {})
    }

    /// Store the analysis of turn `id`, replacing any previous one
    pub fn put_analysis(&self, id: impl Into<CacheKey>, analysis: TurnAnalysis) -> CacheResult<()> {
        self.put_into(CacheTier::Analysis, &self.analysis, id.into(), analysis)
    }

    // ------------------------------------------------------------------
    // Predictions tier
    // ------------------------------------------------------------------

    /// Fresh prediction bundle for `key`
    pub fn get_predictions(&self, key: &str) -> CacheResult<Option<PredictionBundle>> {
        self.get_from(CacheTier::Predictions, &self.predictions, key, |_| {})
    }

    /// Store the prediction bundle for `key`, replacing any previous one
    pub fn put_predictions(
        &self,
        key: impl Into<CacheKey>,
        bundle: PredictionBundle,
    ) -> CacheResult<()> {
        self.put_into(CacheTier::Predictions, &self.predictions, key.into(), bundle)
    }

    // ------------------------------------------------------------------
    // Whole-cache operations
    // ------------------------------------------------------------------

    /// Number of resident entries in `tier`, expired ones included
    pub fn len(&self, tier: CacheTier) -> CacheResult<usize> {
        match tier {
            CacheTier::Context => Ok(self.lock_tier(tier, &self.context)?.len()),
            CacheTier::Analysis => Ok(self.lock_tier(tier, &self.analysis)?.len()),
            CacheTier::Predictions => Ok(self.lock_tier(tier, &self.predictions)?.len()),
        }
    }

    /// Whether `key` is resident in `tier`, regardless of age
    ///
    /// Touches neither recency nor metrics.
    pub fn contains(&self, tier: CacheTier, key: &str) -> CacheResult<bool> {
        match tier {
            CacheTier::Context => Ok(self.lock_tier(tier, &self.context)?.contains(key)),
            CacheTier::Analysis => Ok(self.lock_tier(tier, &self.analysis)?.contains(key)),
            CacheTier::Predictions => Ok(self.lock_tier(tier, &self.predictions)?.contains(key)),
        }
    }

    /// Empty every tier
    ///
    /// Every tier is attempted; the first lock failure is returned.
    pub fn clear_all(&self) -> CacheResult<()> {
        let results = [
            self.lock_tier(CacheTier::Context, &self.context).map(|mut store| store.clear()),
            self.lock_tier(CacheTier::Analysis, &self.analysis).map(|mut store| store.clear()),
            self.lock_tier(CacheTier::Predictions, &self.predictions).map(|mut store| store.clear()),
        ];

        info!("Cleared all cache tiers");
        results.into_iter().collect()
    }

    /// Flat per-entry cost per tier multiplied by occupancy
    pub fn estimate_memory_bytes(&self) -> CacheResult<u64> {
        let mut total = 0_u64;
        for tier in CacheTier::ALL {
            total += estimated_tier_bytes(tier, self.len(tier)?);
        }
        Ok(total)
    }

    /// Remove expired entries from every tier as of the clock's current time
    pub fn sweep_expired(&self) -> SweepReport {
        self.sweep_expired_at(self.clock.now())
    }

    /// Remove every entry older than the TTL at `now`
    ///
    /// Each tier's lock is held for that tier's whole pass. A tier whose lock
    /// cannot be taken is skipped and listed in the report.
    #[instrument(skip(self, now), level = "debug")]
    pub fn sweep_expired_at(&self, now: Instant) -> SweepReport {
        let ttl = self.settings.ttl;
        let mut report = SweepReport::default();

        for tier in CacheTier::ALL {
            let removed = match tier {
                CacheTier::Context => self
                    .lock_tier(tier, &self.context)
                    .map(|mut store| store.remove_if(|_, entry| entry.is_expired(now, ttl))),
                CacheTier::Analysis => self
                    .lock_tier(tier, &self.analysis)
                    .map(|mut store| store.remove_if(|_, entry| entry.is_expired(now, ttl))),
                CacheTier::Predictions => self
                    .lock_tier(tier, &self.predictions)
                    .map(|mut store| store.remove_if(|_, entry| entry.is_expired(now, ttl))),
            };

            match removed {
                Ok(removed) => {
                    report.set(tier, removed);
                    if removed > 0 {
                        debug!(tier = %tier, removed, "Swept expired entries");
                        log_metric(
                            self.metrics.record_expirations(tier, removed as u64),
                            "cache.sweep.expirations",
                        );
                    }
                }
                Err(err) => {
                    warn!(tier = %tier, error = %err, "Skipping tier in expiry sweep");
                    report.skipped.push(tier);
                }
            }
        }

        report
    }

    /// Re-compact every resident context and flag oversized ones
    ///
    /// Flagged entries are trimmed lazily on their next read. Running the pass
    /// again is harmless: compaction is idempotent and already flagged entries
    /// are not counted twice.
    #[instrument(skip(self), level = "debug")]
    pub fn optimize_memory(&self) -> CacheResult<OptimizationReport> {
        let mut report = OptimizationReport::default();

        {
            let mut store = self.lock_tier(CacheTier::Context, &self.context)?;
            store.for_each_mut(|_, entry| {
                let saved = self.compactor.compact(entry.value_mut());
                if saved > 0 {
                    report.compacted += 1;
                    report.bytes_saved += saved;
                }
                if !entry.needs_reoptimization() && self.compactor.is_oversized(entry.value()) {
                    entry.mark_for_reoptimization();
                    report.marked += 1;
                }
            });
        }

        log_metric(
            self.metrics.record_memory_optimization(report.bytes_saved as u64),
            "cache.optimize",
        );
        info!(
            compacted = report.compacted,
            marked = report.marked,
            bytes_saved = report.bytes_saved,
            "Memory optimization pass complete"
        );

        Ok(report)
    }

    /// Snapshot of per-tier and cache-wide statistics
    ///
    /// Each tier is measured once; the memory estimate is derived from the
    /// same sizes the tier statistics report.
    pub fn statistics(&self) -> CacheResult<CacheStatistics> {
        let context = self.tier_statistics(CacheTier::Context)?;
        let analysis = self.tier_statistics(CacheTier::Analysis)?;
        let predictions = self.tier_statistics(CacheTier::Predictions)?;
        let estimated_memory_bytes = [&context, &analysis, &predictions]
            .into_iter()
            .map(|stats| estimated_tier_bytes(stats.tier, stats.size))
            .sum();

        Ok(CacheStatistics {
            context,
            analysis,
            predictions,
            estimated_memory_bytes,
            optimization_runs: self.metrics.optimization_runs(),
            bytes_saved: self.metrics.bytes_saved(),
        })
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn tier_statistics(&self, tier: CacheTier) -> CacheResult<TierStatistics> {
        let counts = self.metrics.counts(tier);
        Ok(TierStatistics {
            tier,
            size: self.len(tier)?,
            capacity: self.capacity(tier),
            hits: counts.hits,
            misses: counts.misses,
            writes: counts.writes,
            evictions: counts.evictions,
            expirations: counts.expirations,
            hit_rate: self.metrics.hit_rate(tier),
            avg_get_latency_ms: self.metrics.average_latency_ms(tier.get_operation()),
            avg_put_latency_ms: self.metrics.average_latency_ms(tier.put_operation()),
        })
    }

    fn capacity(&self, tier: CacheTier) -> usize {
        match tier {
            CacheTier::Context => self.settings.context_capacity,
            CacheTier::Analysis => self.settings.analysis_capacity,
            CacheTier::Predictions => self.settings.predictions_capacity,
        }
    }

    fn lock_tier<'a, T>(
        &self,
        tier: CacheTier,
        store: &'a Tier<T>,
    ) -> CacheResult<MutexGuard<'a, Store<T>>> {
        lock_with_timeout(store, tier.as_str(), self.settings.lock_timeout)
            .map_err(|source| CacheError::tier(tier, source))
    }

    fn get_from<T, F>(
        &self,
        tier: CacheTier,
        store: &Tier<T>,
        key: &str,
        on_hit: F,
    ) -> CacheResult<Option<T>>
    where
        T: Clone,
        F: FnOnce(&mut CacheEntry<T>),
    {
        let started = Instant::now();
        let result = self.lookup(tier, store, key, on_hit);

        let recorded = match &result {
            Ok(Some(_)) => self.metrics.record_hit(tier),
            Ok(None) | Err(_) => self.metrics.record_miss(tier),
        };
        log_metric(recorded, "cache.get");
        self.record_latency(tier.get_operation(), started);

        result
    }

    fn lookup<T, F>(
        &self,
        tier: CacheTier,
        store: &Tier<T>,
        key: &str,
        on_hit: F,
    ) -> CacheResult<Option<T>>
    where
        T: Clone,
        F: FnOnce(&mut CacheEntry<T>),
    {
        let now = self.clock.now();
        let mut store = self.lock_tier(tier, store)?;

        // Peek first so an expired entry keeps its recency position.
        match store.peek(key) {
            None => return Ok(None),
            Some(entry) if entry.is_expired(now, self.settings.ttl) => {
                debug!(tier = %tier, key, "Expired entry treated as miss");
                return Ok(None);
            }
            Some(_) => {}
        }

        Ok(store.get_mut(key).map(|entry| {
            on_hit(entry);
            entry.value().clone()
        }))
    }

    fn put_into<T>(
        &self,
        tier: CacheTier,
        store: &Tier<T>,
        key: CacheKey,
        value: T,
    ) -> CacheResult<()> {
        let started = Instant::now();
        let entry = CacheEntry::new(value, self.clock.now());

        let evicted = self.lock_tier(tier, store)?.put(key, entry);

        if let Some((evicted_key, _)) = evicted {
            debug!(tier = %tier, key = %evicted_key, "Evicted least recently used entry");
            log_metric(self.metrics.record_eviction(tier), "cache.eviction");
        }
        log_metric(self.metrics.record_write(tier), "cache.put");
        self.record_latency(tier.put_operation(), started);

        Ok(())
    }

    fn record_latency(&self, operation: &'static str, started: Instant) {
        let micros = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        log_metric(self.metrics.record_latency(operation, micros), operation);
    }
}

fn capacity(value: usize) -> CacheResult<NonZeroUsize> {
    NonZeroUsize::new(value).ok_or_else(|| {
        CacheError::InvalidSettings(convointel_domain::ConvoIntelError::Config(
            "tier capacity must be greater than zero".into(),
        ))
    })
}

fn estimated_tier_bytes(tier: CacheTier, len: usize) -> u64 {
    len as u64 * entry_cost(tier)
}

fn entry_cost(tier: CacheTier) -> u64 {
    match tier {
        CacheTier::Context => CONTEXT_ENTRY_COST_BYTES,
        CacheTier::Analysis => ANALYSIS_ENTRY_COST_BYTES,
        CacheTier::Predictions => PREDICTIONS_ENTRY_COST_BYTES,
    }
}
