//! Cache trait hierarchy.
//!
//! Three layers, each adding policy-appropriate operations:
//!
//! | Trait            | Extends        | Purpose                              |
//! |------------------|----------------|--------------------------------------|
//! | `CoreCache`      | -              | Universal cache operations           |
//! | `MutableCache`   | `CoreCache`    | Arbitrary and predicate-based removal|
//! | `LruCacheTrait`  | `MutableCache` | LRU-specific recency operations      |
//!
//! The hierarchy keeps generic call sites honest: code that only needs to
//! warm a cache takes `CoreCache`, invalidation paths take `MutableCache`,
//! and eviction-aware plumbing takes `LruCacheTrait`.

/// Core cache operations that all caches support.
///
/// # Type Parameters
///
/// - `K`: Key type (implementations typically require `Eq + Hash`)
/// - `V`: Value type
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use cachebound::traits::CoreCache;
/// use cachebound::policy::lru::LruCore;
///
/// fn warm_cache<C: CoreCache<u64, Arc<String>>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.insert(*key, Arc::new(value.clone()));
///     }
/// }
///
/// let mut cache = LruCore::new(100);
/// warm_cache(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair.
    ///
    /// Returns the previous value if the key existed, or the value evicted to
    /// make room if the insert displaced another entry. Returns `None` when
    /// nothing was replaced or evicted.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Gets a reference to a value by key.
    ///
    /// May update internal state (recency, hit counters) depending on the
    /// eviction policy. Use [`contains`](Self::contains) if you only need to
    /// check existence without affecting eviction order.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks if a key exists without updating access state.
    fn contains(&self, key: &K) -> bool;

    /// Returns the current number of entries in the cache.
    fn len(&self) -> usize;

    /// Returns `true` if the cache contains no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum capacity of the cache.
    fn capacity(&self) -> usize;

    /// Removes all entries from the cache.
    fn clear(&mut self);
}

/// Caches that support arbitrary key-based and predicate-based removal.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use cachebound::traits::{CoreCache, MutableCache};
/// use cachebound::policy::lru::LruCore;
///
/// let mut cache: LruCore<u64, &str> = LruCore::new(100);
/// cache.insert(1, Arc::new("one"));
/// cache.insert(2, Arc::new("two"));
///
/// assert_eq!(cache.remove(&1).as_deref(), Some(&"one"));
/// assert_eq!(cache.remove(&1), None); // already removed
/// ```
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes a specific key-value pair.
    ///
    /// Returns the removed value if the key existed, or `None` if it didn't.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes every entry for which the predicate returns `true`.
    ///
    /// Returns the number of entries removed. Implementations must use
    /// snapshot semantics: the set of visited entries is decided before any
    /// removal, so no entry is skipped or visited twice.
    fn remove_if<F>(&mut self, pred: F) -> usize
    where
        F: FnMut(&K, &V) -> bool;
}

/// LRU-specific operations that respect access order.
///
/// Entries are ordered by recency; the least recently accessed entry is
/// evicted first.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use cachebound::traits::{CoreCache, LruCacheTrait};
/// use cachebound::policy::lru::LruCore;
///
/// let mut cache: LruCore<u64, &str> = LruCore::new(3);
/// cache.insert(1, Arc::new("first"));
/// cache.insert(2, Arc::new("second"));
///
/// // Key 1 is LRU until touched
/// assert_eq!(cache.peek_lru().map(|(k, _)| *k), Some(1));
/// assert!(cache.touch(&1));
/// assert_eq!(cache.peek_lru().map(|(k, _)| *k), Some(2));
/// ```
pub trait LruCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least recently used entry.
    ///
    /// Returns `None` if the cache is empty.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// Peeks at the LRU entry without removing it or updating recency.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Marks an entry as recently used without retrieving the value.
    ///
    /// Returns `true` if the key was found and touched, `false` otherwise.
    /// Does not count as an access for hit-rate purposes.
    fn touch(&mut self, key: &K) -> bool;
}
