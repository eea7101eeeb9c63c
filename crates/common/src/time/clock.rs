//! Monotonic clock abstraction
//!
//! Entry ages are measured against [`Clock::now`] so expiry can be tested by
//! advancing a [`MockClock`] instead of sleeping.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Source of monotonic instants
pub trait Clock: Send + Sync + 'static {
    /// Current monotonic instant
    fn now(&self) -> Instant;
}

/// Real system clock; use this in production code
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for deterministic tests
///
/// Clones share the same elapsed time, so a clone handed to the cache and one
/// kept by the test move together.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use convointel_common::time::{Clock, MockClock};
///
/// let clock = MockClock::new();
/// let observer = clock.clone();
/// let start = observer.now();
///
/// clock.advance(Duration::from_secs(7201));
/// assert_eq!(observer.now().duration_since(start), Duration::from_secs(7201));
/// ```
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    elapsed: Arc<Mutex<Duration>>,
}

impl MockClock {
    /// Create a clock anchored at the current real instant
    pub fn new() -> Self {
        Self { start: Instant::now(), elapsed: Arc::new(Mutex::new(Duration::ZERO)) }
    }

    /// Simulate `duration` passing
    pub fn advance(&self, duration: Duration) {
        *self.elapsed.lock() += duration;
    }

    /// Set the absolute simulated elapsed time
    pub fn set_elapsed(&self, duration: Duration) {
        *self.elapsed.lock() = duration;
    }

    /// Simulated time since construction
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock()
    }
}

impl<C: Clock> Clock for Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for time::clock.
    use super::*;

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();

        assert!(second >= first);
    }

    /// Validates the mock clock advance and set scenario.
    ///
    /// Assertions:
    /// - Confirms `advance` accumulates.
    /// - Confirms `set_elapsed` replaces, including moving backwards.
    #[test]
    fn test_mock_clock_advance_and_set() {
        let clock = MockClock::new();
        let start = clock.now();

        clock.advance(Duration::from_secs(5));
        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.elapsed(), Duration::from_secs(10));
        assert_eq!(clock.now() - start, Duration::from_secs(10));

        clock.set_elapsed(Duration::from_secs(1));
        assert_eq!(clock.now() - start, Duration::from_secs(1));
    }

    #[test]
    fn test_arc_clock_delegates() {
        let clock = Arc::new(MockClock::new());
        let start = clock.now();
        clock.advance(Duration::from_millis(250));

        assert_eq!(Clock::now(&clock) - start, Duration::from_millis(250));
    }
}
