//! Periodic expiry sweep and performance logging
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use convointel_domain::CacheSettings;
//! use convointel_infra::cache::TieredCache;
//! use convointel_infra::scheduling::{MaintenanceConfig, MaintenanceScheduler};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = CacheSettings::default();
//! let cache = Arc::new(TieredCache::new(settings.clone())?);
//! let scheduler = MaintenanceScheduler::new(cache, MaintenanceConfig::from(&settings));
//!
//! scheduler.start()?;
//! // ... application runs ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use convointel_common::{format_duration, Clock, SystemClock};
use convointel_domain::CacheSettings;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::cache::{OptimizationReport, SweepReport, TieredCache};
use crate::observability::stats::log_performance_snapshot;
use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Timing for the maintenance tasks
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceConfig {
    /// Expiry sweep cadence
    pub sweep_interval: Duration,
    /// Performance logging cadence
    pub log_interval: Duration,
    /// Estimated footprint above which a sweep runs memory optimization
    pub memory_threshold_bytes: u64,
    /// Longest wait for each task to finish after cancellation
    pub join_timeout: Duration,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self::from(&CacheSettings::default())
    }
}

impl From<&CacheSettings> for MaintenanceConfig {
    fn from(settings: &CacheSettings) -> Self {
        Self {
            sweep_interval: settings.sweep_interval,
            log_interval: settings.log_interval,
            memory_threshold_bytes: settings.memory_threshold_bytes,
            join_timeout: Duration::from_secs(5),
        }
    }
}

/// Lifecycle of a [`MaintenanceScheduler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerPhase {
    /// Constructed, tasks not spawned
    Idle,
    /// Both tasks spawned
    Running,
    /// Stopped for good
    Disposed,
}

/// Outcome of one sweep tick
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SweepCycleReport {
    /// Entries removed per tier
    pub sweep: SweepReport,
    /// `None` if a tier could not be measured
    pub estimated_memory_bytes: Option<u64>,
    /// Present only when the estimate crossed the threshold
    pub optimization: Option<OptimizationReport>,
}

struct SchedulerState {
    phase: SchedulerPhase,
    handles: Vec<JoinHandle<()>>,
}

/// Owner of the sweep and logging tasks
pub struct MaintenanceScheduler<C: Clock = SystemClock> {
    cache: Arc<TieredCache<C>>,
    config: MaintenanceConfig,
    cancellation_token: CancellationToken,
    state: Mutex<SchedulerState>,
}

impl<C: Clock> MaintenanceScheduler<C> {
    /// Scheduler for `cache`; nothing runs until [`start`](Self::start)
    pub fn new(cache: Arc<TieredCache<C>>, config: MaintenanceConfig) -> Self {
        Self {
            cache,
            config,
            cancellation_token: CancellationToken::new(),
            state: Mutex::new(SchedulerState { phase: SchedulerPhase::Idle, handles: Vec::new() }),
        }
    }

    /// Current lifecycle state
    pub fn phase(&self) -> SchedulerPhase {
        self.state.lock().phase
    }

    /// Whether both tasks have been spawned and not yet stopped
    pub fn is_running(&self) -> bool {
        self.phase() == SchedulerPhase::Running
    }

    /// Spawn both maintenance tasks on the current tokio runtime
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::AlreadyRunning`] if started twice
    /// - [`SchedulerError::Disposed`] after [`stop`](Self::stop)
    /// - [`SchedulerError::NoRuntime`] outside a tokio runtime
    #[instrument(skip(self))]
    pub fn start(&self) -> SchedulerResult<()> {
        let mut state = self.state.lock();
        match state.phase {
            SchedulerPhase::Running => return Err(SchedulerError::AlreadyRunning),
            SchedulerPhase::Disposed => return Err(SchedulerError::Disposed),
            SchedulerPhase::Idle => {}
        }

        let runtime = Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?;

        let sweep = runtime.spawn(sweep_loop(
            Arc::clone(&self.cache),
            self.config.sweep_interval,
            self.config.memory_threshold_bytes,
            self.cancellation_token.clone(),
        ));
        let logging = runtime.spawn(logging_loop(
            Arc::clone(&self.cache),
            self.config.log_interval,
            self.cancellation_token.clone(),
        ));

        state.handles = vec![sweep, logging];
        state.phase = SchedulerPhase::Running;

        info!(
            sweep_interval = %format_duration(self.config.sweep_interval),
            log_interval = %format_duration(self.config.log_interval),
            "Maintenance scheduler started"
        );
        Ok(())
    }

    /// Cancel both tasks and wait for them to finish
    ///
    /// Stopping is terminal and idempotent. The tasks are cancelled before
    /// anything else happens; once this returns `Ok` neither touches the cache
    /// again.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Timeout`] if a task outlives the join timeout
    /// and [`SchedulerError::TaskJoinFailed`] if one panicked.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> SchedulerResult<()> {
        self.cancellation_token.cancel();

        let handles = {
            let mut state = self.state.lock();
            if state.phase == SchedulerPhase::Disposed {
                return Ok(());
            }
            state.phase = SchedulerPhase::Disposed;
            std::mem::take(&mut state.handles)
        };

        info!("Stopping maintenance scheduler");

        let join_timeout = self.config.join_timeout;
        let mut first_error = None;
        for handle in handles {
            let outcome = match tokio::time::timeout(join_timeout, handle).await {
                Ok(joined) => joined.map_err(SchedulerError::from),
                Err(_) => Err(SchedulerError::Timeout { duration: join_timeout }),
            };
            if let Err(err) = outcome {
                warn!(error = %err, "Maintenance task did not stop cleanly");
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => {
                info!("Maintenance scheduler stopped");
                Ok(())
            }
        }
    }
}

/// Ensure the tasks are cancelled when the scheduler is dropped
impl<C: Clock> Drop for MaintenanceScheduler<C> {
    fn drop(&mut self) {
        if !self.cancellation_token.is_cancelled() {
            if self.state.get_mut().phase == SchedulerPhase::Running {
                warn!("MaintenanceScheduler dropped while running; cancelling");
            }
            self.cancellation_token.cancel();
        }
    }
}

/// Sweep expired entries, then optimize if the estimate is above `threshold`
pub fn run_sweep_cycle<C: Clock>(cache: &TieredCache<C>, threshold: u64) -> SweepCycleReport {
    let sweep = cache.sweep_expired();
    if sweep.total() > 0 {
        info!(removed = sweep.total(), "Expired cache entries swept");
    }

    let estimated_memory_bytes = match cache.estimate_memory_bytes() {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            warn!(error = %err, "Could not estimate cache memory after sweep");
            None
        }
    };

    let optimization = match estimated_memory_bytes {
        Some(bytes) if bytes > threshold => {
            info!(estimated_bytes = bytes, threshold, "Memory threshold exceeded, optimizing");
            match cache.optimize_memory() {
                Ok(report) => Some(report),
                Err(err) => {
                    warn!(error = %err, "Memory optimization pass failed");
                    None
                }
            }
        }
        _ => None,
    };

    SweepCycleReport { sweep, estimated_memory_bytes, optimization }
}

async fn sweep_loop<C: Clock>(
    cache: Arc<TieredCache<C>>,
    interval: Duration,
    threshold: u64,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Sweep loop cancelled");
                break;
            }
            _ = tokio::time::sleep(interval) => {
                run_sweep_cycle(&cache, threshold);
            }
        }
    }
}

async fn logging_loop<C: Clock>(
    cache: Arc<TieredCache<C>>,
    interval: Duration,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Logging loop cancelled");
                break;
            }
            _ = tokio::time::sleep(interval) => {
                match cache.statistics() {
                    Ok(stats) => log_performance_snapshot(&stats),
                    Err(err) => warn!(error = %err, "Skipping performance snapshot"),
                }
            }
        }
    }
}
