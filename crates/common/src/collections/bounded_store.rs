//! Fixed-capacity store with least-recently-used eviction
//!
//! Wraps the `lru` crate with the operations the artifact tiers need:
//! eviction reporting on insert, predicate-based removal and in-place
//! mutation of every resident entry.

use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;

use lru::LruCache;

/// Bounded key/value store ordered by recency of access
///
/// `len()` never exceeds `capacity()`. Every [`put`](Self::put) inserts at the
/// most-recently-used end and, when the store is already full, evicts exactly
/// one least-recently-used entry.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use convointel_common::collections::BoundedStore;
///
/// let mut store = BoundedStore::new(NonZeroUsize::new(2).expect("capacity must be > 0"));
/// store.put("a", 1);
/// store.put("b", 2);
///
/// assert_eq!(store.get(&"a"), Some(&1)); // "a" is now most recent
///
/// let evicted = store.put("c", 3);
/// assert_eq!(evicted, Some(("b", 2)));
/// ```
#[derive(Debug)]
pub struct BoundedStore<K, V>
where
    K: Hash + Eq,
{
    inner: LruCache<K, V>,
}

impl<K: Hash + Eq, V> BoundedStore<K, V> {
    /// Create a store holding at most `capacity` entries
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self { inner: LruCache::new(capacity) }
    }

    /// Try to create a store with the specified capacity
    ///
    /// Returns None if capacity is zero
    pub fn try_new(capacity: usize) -> Option<Self> {
        NonZeroUsize::new(capacity).map(Self::new)
    }

    /// Insert or replace `key`, marking it most recently used
    ///
    /// Replacing an existing key never evicts. Inserting a new key into a full
    /// store evicts the least recently used entry and returns it.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.inner.contains(&key) {
            self.inner.put(key, value);
            return None;
        }
        self.inner.push(key, value)
    }

    /// Get a value and promote it to most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.get(key)
    }

    /// Get a mutable value and promote it to most recently used
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.get_mut(key)
    }

    /// Look at a value without touching recency
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.peek(key)
    }

    /// Check if a key is resident without touching recency
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.contains(key)
    }

    /// Remove a key from the store
    pub fn pop<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.pop(key)
    }

    /// Visit every entry mutably without changing recency order
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V),
    {
        for (key, value) in self.inner.iter_mut() {
            f(key, value);
        }
    }

    /// Number of resident entries
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Maximum number of resident entries
    pub fn capacity(&self) -> usize {
        self.inner.cap().get()
    }

    /// Drop every entry, keeping the capacity
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Iterate entries from most to least recently used
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.inner.iter()
    }
}

impl<K: Hash + Eq + Clone, V> BoundedStore<K, V> {
    /// Remove every entry matching `predicate`
    ///
    /// Returns the number of removed entries. Survivors keep their relative
    /// recency order.
    pub fn remove_if<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        let doomed: Vec<K> = self
            .inner
            .iter()
            .filter(|&(key, value)| predicate(key, value))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &doomed {
            self.inner.pop(key);
        }

        doomed.len()
    }
}
