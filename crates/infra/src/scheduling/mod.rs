//! Background maintenance for the tiered cache
//!
//! Two periodic tasks run beside the foreground operations: an expiry sweep
//! (followed by a memory optimization pass when the estimate crosses the
//! threshold) and a performance logging task. Both follow the same lifecycle:
//! - Explicit start/stop; no restart once stopped
//! - Join handles kept for every spawned task
//! - One cancellation token shared by both tasks
//! - Joins wrapped in a timeout

pub mod error;
pub mod maintenance;

pub use error::{SchedulerError, SchedulerResult};
pub use maintenance::{
    run_sweep_cycle, MaintenanceConfig, MaintenanceScheduler, SchedulerPhase, SweepCycleReport,
};
