//! Memory-bounded LRU cache with hit-rate accounting.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                  ConcurrentLruCache<K, V>                    │
//!   │                                                              │
//!   │            Arc<RwLock<LruCore<K, V>>>                        │
//!   │                        │                                     │
//!   │                        ▼                                     │
//!   │   ┌──────────────────────────────────────────────────────┐   │
//!   │   │                 LruCore<K, V>                        │   │
//!   │   │                                                      │   │
//!   │   │  FxHashMap<K, Entry<V>>    entry = value + tick      │   │
//!   │   │  BTreeMap<u64, K>          recency index             │   │
//!   │   │  clock: u64                monotonic logical ticks   │   │
//!   │   │  HitStats                  hits / accesses           │   │
//!   │   └──────────────────────────────────────────────────────┘   │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every insert and every successful lookup stamps the entry with a fresh
//! tick from the logical clock and re-files it in the recency index. The
//! index is ordered by tick, so the entry under the smallest tick is always
//! the least recently used one. Ticks are unique (the clock never repeats a
//! value), which makes the recency ordering total: two entries can never tie,
//! and eviction is deterministic.
//!
//! ## Operations
//!
//! | Method            | Complexity | Counters | Recency |
//! |-------------------|------------|----------|---------|
//! | `insert(k, v)`    | O(log n)   | no       | refresh |
//! | `get(&k)`         | O(log n)   | yes      | refresh |
//! | `peek(&k)`        | O(1)       | no       | no      |
//! | `contains(&k)`    | O(1)       | no       | no      |
//! | `remove(&k)`      | O(log n)   | no       | -       |
//! | `remove_if(pred)` | O(n log n) | no       | -       |
//! | `pop_lru()`       | O(log n)   | no       | -       |
//! | `touch(&k)`       | O(log n)   | no       | refresh |
//! | `set_capacity(n)` | O(k log n) | no       | -       |
//!
//! Counters only track `get`: `hits / accesses * 100` is queryable through
//! [`LruCore::hit_rate`] and [`LruCore::stats`] at any time.
//!
//! ## Thread Safety
//!
//! - `LruCore`: **NOT thread-safe**, single-threaded core.
//! - `ConcurrentLruCache`: thread-safe wrapper via `parking_lot::RwLock`.
//!   Every operation that reorders or mutates (including `get`, which
//!   refreshes recency) holds the write lock for its full read-modify-write
//!   sequence, so capacity checks, eviction and insertion are one atomic
//!   unit. Pure reads (`peek`, `contains`, `len`, `hit_rate`) share the read
//!   lock. Values are held as `Arc<V>`, so a caller may keep a value alive
//!   after the cache has evicted it.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

#[cfg(feature = "concurrency")]
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::{ConfigError, InvariantError};
use crate::stats::{HitStats, StatsSnapshot};
use crate::traits::{CoreCache, LruCacheTrait, MutableCache};

/// Stored value plus the recency tick under which it is filed in the index.
struct Entry<V> {
    value: Arc<V>,
    tick: u64,
}

/// Single-threaded bounded LRU cache core.
///
/// Keys live twice: once in the hash map and once in the recency index, so
/// `K: Clone` is required. Values are `Arc<V>` for zero-copy sharing with
/// callers that outlive an eviction.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use cachebound::policy::lru::LruCore;
/// use cachebound::traits::CoreCache;
///
/// let mut cache: LruCore<&str, u32> = LruCore::new(3);
/// cache.insert("a", Arc::new(1));
/// cache.insert("b", Arc::new(2));
/// cache.insert("c", Arc::new(3));
///
/// // Touch "a" so "b" becomes the eviction victim.
/// cache.get(&"a");
/// let evicted = cache.insert("d", Arc::new(4));
/// assert_eq!(evicted.as_deref(), Some(&2));
/// assert_eq!(cache.len(), 3);
/// assert!(!cache.contains(&"b"));
/// ```
pub struct LruCore<K, V>
where
    K: Clone + Eq + Hash,
{
    map: FxHashMap<K, Entry<V>>,
    /// Recency index: tick -> key. Smallest tick is the LRU victim.
    order: BTreeMap<u64, K>,
    /// Logical clock; bumped on every insert, get and touch. Never reused.
    clock: u64,
    capacity: usize,
    stats: HitStats,
}

impl<K, V> LruCore<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates a cache bounded to `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Use [`try_new`](Self::try_new) to handle
    /// user-supplied capacities without panicking.
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("LruCore::new: {err}"),
        }
    }

    /// Fallible constructor: rejects a zero capacity with [`ConfigError`].
    ///
    /// # Example
    ///
    /// ```
    /// use cachebound::policy::lru::LruCore;
    ///
    /// assert!(LruCore::<u64, u64>::try_new(8).is_ok());
    /// assert!(LruCore::<u64, u64>::try_new(0).is_err());
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be greater than zero"));
        }
        Ok(LruCore {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: BTreeMap::new(),
            clock: 0,
            capacity,
            stats: HitStats::default(),
        })
    }

    #[inline]
    fn next_tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Evict the entry under the smallest tick. `None` when empty.
    fn evict_lru(&mut self) -> Option<(K, Arc<V>)> {
        let (_, key) = self.order.pop_first()?;
        let entry = self.map.remove(&key)?;
        Some((key, entry.value))
    }

    /// Read without touching recency or counters.
    #[inline]
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        self.map.get(key).map(|entry| Arc::clone(&entry.value))
    }

    /// Resizes the cache at runtime.
    ///
    /// Shrinking below the current size immediately evicts the oldest
    /// `len - new_capacity` entries, oldest first. Growing never evicts.
    /// A zero capacity is rejected with [`ConfigError`].
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use cachebound::policy::lru::LruCore;
    /// use cachebound::traits::CoreCache;
    ///
    /// let mut cache: LruCore<u32, u32> = LruCore::new(4);
    /// for i in 0..4 {
    ///     cache.insert(i, Arc::new(i));
    /// }
    ///
    /// cache.set_capacity(2).unwrap();
    /// assert_eq!(cache.len(), 2);
    /// // The two most recently inserted keys survive.
    /// assert!(cache.contains(&2));
    /// assert!(cache.contains(&3));
    /// ```
    pub fn set_capacity(&mut self, new_capacity: usize) -> Result<(), ConfigError> {
        if new_capacity == 0 {
            return Err(ConfigError::new("capacity must be greater than zero"));
        }
        while self.map.len() > new_capacity {
            self.evict_lru();
        }
        self.capacity = new_capacity;
        Ok(())
    }

    /// Snapshot of the stored keys, in unspecified order.
    pub fn keys(&self) -> Vec<K> {
        self.map.keys().cloned().collect()
    }

    /// Visits every stored value, in unspecified order.
    ///
    /// Does not touch recency or counters.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&V),
    {
        for entry in self.map.values() {
            visit(&entry.value);
        }
    }

    /// Hit rate as a percentage; `0.0` before the first lookup.
    #[inline]
    pub fn hit_rate(&self) -> f64 {
        self.stats.hit_rate()
    }

    /// Point-in-time counters and occupancy.
    pub fn stats(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.stats.hits(),
            accesses: self.stats.accesses(),
            hit_rate: self.stats.hit_rate(),
            len: self.map.len(),
            capacity: self.capacity,
        }
    }

    /// Verifies the map/index correspondence and the capacity bound.
    ///
    /// Intended for tests and debugging; all public operations uphold these
    /// invariants.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.map.len() != self.order.len() {
            return Err(InvariantError::new(format!(
                "map/index length mismatch: map={} index={}",
                self.map.len(),
                self.order.len()
            )));
        }
        if self.map.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "size {} exceeds capacity {}",
                self.map.len(),
                self.capacity
            )));
        }
        for (tick, key) in &self.order {
            match self.map.get(key) {
                Some(entry) if entry.tick == *tick => {},
                Some(entry) => {
                    return Err(InvariantError::new(format!(
                        "index tick {} disagrees with entry tick {}",
                        tick, entry.tick
                    )));
                },
                None => {
                    return Err(InvariantError::new("index key missing from map"));
                },
            }
        }
        Ok(())
    }
}

impl<K> LruCore<K, K>
where
    K: Clone + Eq + Hash,
{
    /// Caches a value under itself (`key == value`).
    ///
    /// Equivalent to `insert(value.clone(), Arc::new(value))`; the same
    /// replace/evict return contract applies.
    ///
    /// # Example
    ///
    /// ```
    /// use cachebound::policy::lru::LruCore;
    /// use cachebound::traits::CoreCache;
    ///
    /// let mut interned: LruCore<String, String> = LruCore::new(100);
    /// interned.cache("session-41".to_string());
    /// assert!(interned.contains(&"session-41".to_string()));
    /// ```
    pub fn cache(&mut self, value: K) -> Option<Arc<K>> {
        self.insert(value.clone(), Arc::new(value))
    }
}

impl<K, V> CoreCache<K, Arc<V>> for LruCore<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Inserts or replaces the entry for `key`.
    ///
    /// Updating an existing key replaces its value, refreshes its recency
    /// (an update counts as a fresh access for eviction purposes) and
    /// returns the previous value. Inserting a new key while full first
    /// evicts the least recently used entry and returns the victim's value.
    /// Never increments the hit/access counters.
    fn insert(&mut self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        let tick = self.next_tick();

        if let Some(entry) = self.map.get_mut(&key) {
            let previous = std::mem::replace(&mut entry.value, value);
            let old_tick = std::mem::replace(&mut entry.tick, tick);
            self.order.remove(&old_tick);
            self.order.insert(tick, key);
            return Some(previous);
        }

        let evicted = if self.map.len() >= self.capacity {
            self.evict_lru().map(|(_, value)| value)
        } else {
            None
        };

        self.map.insert(key.clone(), Entry { value, tick });
        self.order.insert(tick, key);
        evicted
    }

    /// Looks up `key`, refreshing its recency on a hit.
    ///
    /// Always increments the access counter; a hit additionally increments
    /// the hit counter. A miss leaves recency untouched and is
    /// indistinguishable from "never cached".
    fn get(&mut self, key: &K) -> Option<&Arc<V>> {
        if !self.map.contains_key(key) {
            self.stats.record(false);
            return None;
        }
        self.stats.record(true);

        let tick = self.next_tick();
        if let Some(entry) = self.map.get_mut(key) {
            let old_tick = std::mem::replace(&mut entry.tick, tick);
            self.order.remove(&old_tick);
            self.order.insert(tick, key.clone());
        }
        self.map.get(key).map(|entry| &entry.value)
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }
}

impl<K, V> MutableCache<K, Arc<V>> for LruCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn remove(&mut self, key: &K) -> Option<Arc<V>> {
        let entry = self.map.remove(key)?;
        self.order.remove(&entry.tick);
        Some(entry.value)
    }

    /// Removes every entry matching the predicate.
    ///
    /// The matching set is decided over a snapshot of the entries before any
    /// removal happens, so mutation cannot skip or double-visit an entry.
    fn remove_if<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&K, &Arc<V>) -> bool,
    {
        let doomed: Vec<K> = self
            .map
            .iter()
            .filter(|&(key, entry)| pred(key, &entry.value))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &doomed {
            if let Some(entry) = self.map.remove(key) {
                self.order.remove(&entry.tick);
            }
        }
        doomed.len()
    }
}

impl<K, V> LruCacheTrait<K, Arc<V>> for LruCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn pop_lru(&mut self) -> Option<(K, Arc<V>)> {
        self.evict_lru()
    }

    fn peek_lru(&self) -> Option<(&K, &Arc<V>)> {
        let (_, key) = self.order.first_key_value()?;
        let entry = self.map.get(key)?;
        Some((key, &entry.value))
    }

    fn touch(&mut self, key: &K) -> bool {
        if !self.map.contains_key(key) {
            return false;
        }
        let tick = self.next_tick();
        if let Some(entry) = self.map.get_mut(key) {
            let old_tick = std::mem::replace(&mut entry.tick, tick);
            self.order.remove(&old_tick);
            self.order.insert(tick, key.clone());
        }
        true
    }
}

impl<K, V> fmt::Debug for LruCore<K, V>
where
    K: Clone + Eq + Hash + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, Arc<V>)> for LruCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn extend<T: IntoIterator<Item = (K, Arc<V>)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Thread-safe LRU cache wrapper.
///
/// Clones share the same underlying cache. All recency-mutating operations
/// (including `get`) run under the write lock as a single atomic unit; pure
/// reads share the read lock.
///
/// # Example
///
/// ```
/// use cachebound::policy::lru::ConcurrentLruCache;
///
/// let cache: ConcurrentLruCache<u32, String> = ConcurrentLruCache::new(100);
/// cache.insert(1, "one".to_string());
///
/// let value = cache.get(&1).unwrap();
/// assert_eq!(*value, "one");
/// assert_eq!(cache.hit_rate(), 100.0);
/// ```
#[cfg(feature = "concurrency")]
#[derive(Clone)]
pub struct ConcurrentLruCache<K, V>
where
    K: Clone + Eq + Hash,
{
    inner: Arc<RwLock<LruCore<K, V>>>,
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentLruCache<K, V>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Send + Sync,
{
    /// Creates a thread-safe cache bounded to `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; see [`try_new`](Self::try_new).
    pub fn new(capacity: usize) -> Self {
        ConcurrentLruCache {
            inner: Arc::new(RwLock::new(LruCore::new(capacity))),
        }
    }

    /// Fallible constructor: rejects a zero capacity with [`ConfigError`].
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Ok(ConcurrentLruCache {
            inner: Arc::new(RwLock::new(LruCore::try_new(capacity)?)),
        })
    }

    /// Inserts a value, wrapping it in `Arc<V>` internally.
    ///
    /// Returns the replaced value for an existing key, or the evicted
    /// victim's value when a new key displaced the LRU entry.
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        let mut cache = self.inner.write();
        cache.insert(key, Arc::new(value))
    }

    /// Inserts a pre-wrapped `Arc<V>` directly.
    pub fn insert_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        let mut cache = self.inner.write();
        cache.insert(key, value)
    }

    /// Looks up a key, refreshing its recency and counting the access.
    ///
    /// Takes the write lock: the counter update, recency refresh and value
    /// read are one atomic sequence.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let mut cache = self.inner.write();
        cache.get(key).map(Arc::clone)
    }

    /// Reads a value without touching recency or counters.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        let cache = self.inner.read();
        cache.peek(key)
    }

    /// Checks key existence; no recency or counter effect.
    pub fn contains(&self, key: &K) -> bool {
        let cache = self.inner.read();
        cache.contains(key)
    }

    /// Removes an entry and returns its value.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        let mut cache = self.inner.write();
        cache.remove(key)
    }

    /// Removes every entry matching the predicate; returns how many.
    ///
    /// Runs under the write lock with snapshot semantics.
    pub fn remove_if<F>(&self, mut pred: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut cache = self.inner.write();
        cache.remove_if(|key, value| pred(key, value.as_ref()))
    }

    /// Resizes the cache, evicting oldest-first when shrinking.
    pub fn set_capacity(&self, new_capacity: usize) -> Result<(), ConfigError> {
        let mut cache = self.inner.write();
        cache.set_capacity(new_capacity)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&self) -> Option<(K, Arc<V>)> {
        let mut cache = self.inner.write();
        cache.pop_lru()
    }

    /// Peeks at the LRU entry without removing it.
    pub fn peek_lru(&self) -> Option<(K, Arc<V>)> {
        let cache = self.inner.read();
        cache.peek_lru().map(|(k, v)| (k.clone(), Arc::clone(v)))
    }

    /// Marks an entry as recently used without retrieving the value.
    pub fn touch(&self, key: &K) -> bool {
        let mut cache = self.inner.write();
        cache.touch(key)
    }

    /// Current entry count.
    pub fn len(&self) -> usize {
        let cache = self.inner.read();
        cache.len()
    }

    /// `true` when no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum entry count.
    pub fn capacity(&self) -> usize {
        let cache = self.inner.read();
        cache.capacity()
    }

    /// Removes all entries. Counters are retained.
    pub fn clear(&self) {
        let mut cache = self.inner.write();
        cache.clear()
    }

    /// Snapshot of the stored keys, in unspecified order.
    pub fn keys(&self) -> Vec<K> {
        let cache = self.inner.read();
        cache.keys()
    }

    /// Visits every stored value under the read lock, in unspecified order.
    pub fn for_each<F>(&self, visit: F)
    where
        F: FnMut(&V),
    {
        let cache = self.inner.read();
        cache.for_each(visit)
    }

    /// Hit rate as a percentage; `0.0` before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let cache = self.inner.read();
        cache.hit_rate()
    }

    /// Point-in-time counters and occupancy.
    pub fn stats(&self) -> StatsSnapshot {
        let cache = self.inner.read();
        cache.stats()
    }

    /// Verifies internal invariants; see [`LruCore::check_invariants`].
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let cache = self.inner.read();
        cache.check_invariants()
    }
}

#[cfg(feature = "concurrency")]
impl<K> ConcurrentLruCache<K, K>
where
    K: Clone + Eq + Hash + Send + Sync,
{
    /// Caches a value under itself (`key == value`).
    pub fn cache(&self, value: K) -> Option<Arc<K>> {
        let mut cache = self.inner.write();
        cache.cache(value)
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> fmt::Debug for ConcurrentLruCache<K, V>
where
    K: Clone + Eq + Hash + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.read();
        f.debug_struct("ConcurrentLruCache")
            .field("len", &cache.len())
            .field("capacity", &cache.capacity())
            .finish_non_exhaustive()
    }
}
