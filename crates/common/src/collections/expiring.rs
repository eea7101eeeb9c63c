//! Cache entries that carry their own creation timestamp
//!
//! An entry's age is measured against the instant it was constructed. The
//! timestamp cannot be changed afterwards: replacing or trimming the payload
//! in place keeps the original age.

use std::time::{Duration, Instant};

/// Payload wrapper with an immutable creation timestamp
///
/// # Example
/// ```
/// use std::time::{Duration, Instant};
///
/// use convointel_common::collections::CacheEntry;
///
/// let created = Instant::now();
/// let entry = CacheEntry::new("artifact", created);
///
/// assert!(!entry.is_expired(created + Duration::from_secs(60), Duration::from_secs(60)));
/// assert!(entry.is_expired(created + Duration::from_secs(61), Duration::from_secs(60)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    value: T,
    created_at: Instant,
    needs_reoptimization: bool,
}

impl<T> CacheEntry<T> {
    /// Wrap `value`, stamping it with `created_at`
    pub fn new(value: T, created_at: Instant) -> Self {
        Self { value, created_at, needs_reoptimization: false }
    }

    /// Borrow the payload
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Mutably borrow the payload; the timestamp is untouched
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Unwrap the payload
    pub fn into_value(self) -> T {
        self.value
    }

    /// Instant the entry was created
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Age of the entry at `now` (zero if `now` precedes creation)
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    /// `true` once the entry is strictly older than `ttl`
    ///
    /// Pure: checking never mutates the entry.
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) > ttl
    }

    /// Flag the payload for lazy re-derivation on its next read
    pub fn mark_for_reoptimization(&mut self) {
        self.needs_reoptimization = true;
    }

    /// Whether a re-derivation is pending
    pub fn needs_reoptimization(&self) -> bool {
        self.needs_reoptimization
    }

    /// Clear the pending flag, returning its previous value
    pub fn take_reoptimization_flag(&mut self) -> bool {
        std::mem::replace(&mut self.needs_reoptimization, false)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for collections::expiring.
    use super::*;

    /// Validates the strict comparison at the TTL boundary.
    ///
    /// Assertions:
    /// - Ensures an entry exactly `ttl` old is still fresh.
    /// - Ensures an entry one nanosecond past `ttl` is expired.
    #[test]
    fn test_expiry_boundary_is_strict() {
        let created = Instant::now();
        let ttl = Duration::from_secs(3600);
        let entry = CacheEntry::new(1_u8, created);

        assert!(!entry.is_expired(created + ttl, ttl));
        assert!(entry.is_expired(created + ttl + Duration::from_nanos(1), ttl));
    }

    #[test]
    fn test_now_before_creation_is_not_expired() {
        let earlier = Instant::now();
        let entry = CacheEntry::new((), earlier + Duration::from_secs(5));

        assert_eq!(entry.age(earlier), Duration::ZERO);
        assert!(!entry.is_expired(earlier, Duration::ZERO));
    }

    /// Validates that mutating the payload and toggling the flag keep the
    /// timestamp.
    ///
    /// Assertions:
    /// - Confirms `created_at()` is unchanged after `value_mut` and flag calls.
    /// - Confirms `take_reoptimization_flag` returns true once, then false.
    #[test]
    fn test_payload_mutation_keeps_timestamp() {
        let created = Instant::now();
        let mut entry = CacheEntry::new(vec![1, 2, 3], created);

        entry.value_mut().truncate(1);
        entry.mark_for_reoptimization();

        assert_eq!(entry.created_at(), created);
        assert_eq!(entry.value(), &vec![1]);
        assert!(entry.needs_reoptimization());
        assert!(entry.take_reoptimization_flag());
        assert!(!entry.take_reoptimization_flag());
        assert_eq!(entry.into_value(), vec![1]);
    }
}
