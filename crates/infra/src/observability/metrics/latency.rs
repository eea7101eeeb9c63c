//! Rolling latency windows keyed by operation name
//!
//! ## Design
//! - **RingBuffer per operation**: the most recent samples only; pushing into a
//!   full window drops the single oldest sample, never the whole window
//! - **Poison-safe locking** with explicit match pattern (no .expect())
//! - **Microsecond storage** - samples are raw µs, reporting converts to ms

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use convointel_common::RingBuffer;
use convointel_domain::constants::LATENCY_WINDOW_SIZE;

use crate::observability::{MetricsError, MetricsResult};

type Windows = HashMap<String, RingBuffer<u64>>;

/// Latency samples for every recorded operation
#[derive(Debug)]
pub struct LatencyWindows {
    window_size: usize,
    windows: Mutex<Windows>,
}

impl Default for LatencyWindows {
    fn default() -> Self {
        Self::new(LATENCY_WINDOW_SIZE)
    }
}

impl LatencyWindows {
    /// Windows keeping at most `window_size` samples per operation
    pub fn new(window_size: usize) -> Self {
        Self { window_size, windows: Mutex::new(HashMap::new()) }
    }

    /// Record one sample for `operation`
    pub fn record(&self, operation: &str, micros: u64) -> MetricsResult<()> {
        let mut windows = self.lock();
        match windows.get_mut(operation) {
            Some(window) => {
                window.push(micros);
            }
            None => {
                let mut window = RingBuffer::new(self.window_size);
                window.push(micros);
                windows.insert(operation.to_owned(), window);
            }
        }
        Ok(())
    }

    /// Mean of the retained samples for `operation`, in milliseconds
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::EmptyData`] if nothing was recorded for it.
    pub fn average_ms(&self, operation: &str) -> MetricsResult<f64> {
        let windows = self.lock();
        let window = windows
            .get(operation)
            .filter(|window| !window.is_empty())
            .ok_or_else(|| MetricsError::EmptyData {
                metric: "average",
                operation: operation.to_owned(),
            })?;

        let total: u64 = window.iter().sum();
        Ok(total as f64 / window.len() as f64 / 1_000.0)
    }

    /// Number of retained samples for `operation`
    pub fn sample_count(&self, operation: &str) -> usize {
        self.lock().get(operation).map_or(0, RingBuffer::len)
    }

    fn lock(&self) -> MutexGuard<'_, Windows> {
        match self.windows.lock() {
            Ok(guard) => guard,
            Err(poison_err) => {
                tracing::warn!(
                    metric = "LatencyWindows::windows",
                    "Mutex poisoned during latency access, recovering data"
                );
                poison_err.into_inner()
            }
        }
    }
}
