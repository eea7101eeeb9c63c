//! Bounded-wait lock acquisition
//!
//! Cache operations never block indefinitely on a contended store. A lock that
//! cannot be taken within the configured window surfaces as a
//! [`CommonError::Lock`] naming the contended resource, and the caller decides
//! whether to degrade or retry.

use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use tracing::debug;

use crate::error::{CommonError, CommonResult};

/// Acquire `mutex`, waiting at most `timeout`
///
/// # Errors
///
/// Returns [`CommonError::Lock`] tagged with `resource` if the lock is still
/// held elsewhere when the window elapses.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use convointel_common::lock_with_timeout;
/// use parking_lot::Mutex;
///
/// let counter = Mutex::new(0_u32);
/// {
///     let mut guard = lock_with_timeout(&counter, "counter", Duration::from_millis(10)).unwrap();
///     *guard += 1;
/// }
/// assert_eq!(*counter.lock(), 1);
/// ```
pub fn lock_with_timeout<'a, T>(
    mutex: &'a Mutex<T>,
    resource: &'static str,
    timeout: Duration,
) -> CommonResult<MutexGuard<'a, T>> {
    mutex.try_lock_for(timeout).ok_or_else(|| {
        debug!(resource, timeout_ms = timeout.as_millis() as u64, "lock acquisition timed out");
        CommonError::lock(resource, timeout)
    })
}
