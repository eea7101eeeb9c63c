//! A fixed-capacity sample window that drops its oldest element on overflow.
//!
//! A [`RingBuffer`] keeps items in insertion order while bounding its length by
//! the capacity given at construction. Pushing into a full buffer discards
//! exactly one item, the oldest, and hands it back to the caller. The buffer is
//! never reset implicitly, so it always holds the most recent `capacity`
//! samples.
//!
//! # Complexity
//! - `push`, `pop`, `len`, `is_full` and `latest` are **O(1)**.
//!
//! # Thread Safety
//! - No interior mutability. Share it behind a lock.

use std::collections::VecDeque;

/// Bounded first-in-first-out buffer
///
/// # Examples
///
/// ```rust
/// use convointel_common::collections::RingBuffer;
///
/// let mut window = RingBuffer::new(3);
/// window.push(1);
/// window.push(2);
/// window.push(3);
/// assert_eq!(window.push(4), Some(1)); // the oldest sample is dropped
///
/// assert_eq!(window.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
/// assert_eq!(window.latest(), Some(&4));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingBuffer<T> {
    buf: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Creates a buffer holding at most `capacity` items.
    ///
    /// A capacity of zero is clamped to `1`.
    #[inline]
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { buf: VecDeque::with_capacity(capacity), capacity }
    }

    /// Appends an item, returning the single oldest item if one was dropped.
    #[inline]
    pub fn push(&mut self, item: T) -> Option<T> {
        let displaced = if self.is_full() { self.buf.pop_front() } else { None };
        self.buf.push_back(item);
        displaced
    }

    /// Removes and returns the oldest item.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.buf.pop_front()
    }

    /// Returns the most recently pushed item.
    #[inline]
    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        self.buf.back()
    }

    /// Returns the number of items currently stored.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` when the buffer has no items.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns `true` when the next push will drop an item.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.buf.len() >= self.capacity
    }

    /// Returns the maximum number of items the buffer holds.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes all elements, leaving the capacity unchanged.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Iterates from oldest to newest.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buf.iter()
    }
}

impl<T> Default for RingBuffer<T> {
    #[inline]
    fn default() -> Self {
        Self::new(1)
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.buf.iter()
    }
}
