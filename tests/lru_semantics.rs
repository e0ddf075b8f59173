// End-to-end semantics of the concurrent wrapper: eviction order, counters,
// bulk removal and runtime resize, exercised through the public API only.
#![cfg(feature = "concurrency")]

use cachebound::policy::lru::ConcurrentLruCache;

#[test]
fn put_get_round_trip() {
    let cache: ConcurrentLruCache<&str, i32> = ConcurrentLruCache::new(10);
    cache.insert("k", 7);
    assert_eq!(cache.get(&"k").as_deref(), Some(&7));
}

#[test]
fn distinct_key_inserts_track_size() {
    let cache: ConcurrentLruCache<u32, u32> = ConcurrentLruCache::new(10);
    for i in 0..7 {
        cache.insert(i, i);
        // Re-inserting the same key must not grow the cache.
        cache.insert(i, i + 100);
    }
    assert_eq!(cache.len(), 7);
    cache.check_invariants().unwrap();
}

#[test]
fn full_cache_evicts_exactly_one_oldest_entry() {
    let cache: ConcurrentLruCache<u32, u32> = ConcurrentLruCache::new(4);
    for i in 0..4 {
        cache.insert(i, i * 10);
    }

    let evicted = cache.insert(99, 990);
    assert_eq!(evicted.as_deref(), Some(&0)); // key 0 was oldest
    assert_eq!(cache.len(), 4);
    assert!(!cache.contains(&0));
    for key in [1, 2, 3, 99] {
        assert!(cache.contains(&key));
    }
}

#[test]
fn repeated_get_protects_key_across_many_evictions() {
    let cache: ConcurrentLruCache<u32, u32> = ConcurrentLruCache::new(3);
    cache.insert(1, 1);
    cache.insert(2, 2);
    cache.insert(3, 3);

    for new_key in 10..20 {
        cache.get(&1);
        cache.insert(new_key, new_key);
        assert!(cache.contains(&1), "hot key evicted at insert {new_key}");
        assert_eq!(cache.len(), 3);
    }
}

#[test]
fn counters_follow_get_only() {
    let cache: ConcurrentLruCache<u32, u32> = ConcurrentLruCache::new(4);
    cache.insert(1, 1);

    cache.get(&1); // hit
    cache.get(&2); // miss
    cache.get(&2); // miss
    cache.touch(&1);
    cache.remove(&1);
    cache.insert(5, 5);

    let snap = cache.stats();
    assert_eq!(snap.accesses, 3);
    assert_eq!(snap.hits, 1);
}

#[test]
fn hit_rate_formula_and_zero_access_case() {
    let cache: ConcurrentLruCache<u32, u32> = ConcurrentLruCache::new(4);
    assert_eq!(cache.hit_rate(), 0.0);

    cache.insert(1, 1);
    cache.get(&1);
    cache.get(&1);
    cache.get(&9);
    cache.get(&9);
    assert_eq!(cache.hit_rate(), 50.0);
    assert_eq!(cache.stats().hit_rate, 50.0);
}

#[test]
fn miss_is_indistinguishable_from_never_cached() {
    let cache: ConcurrentLruCache<u32, u32> = ConcurrentLruCache::new(4);
    cache.insert(1, 1);
    cache.remove(&1);
    assert_eq!(cache.get(&1), None); // removed
    assert_eq!(cache.get(&2), None); // never cached
}

#[test]
fn remove_if_matching_all_empties_cache() {
    let cache: ConcurrentLruCache<u32, String> = ConcurrentLruCache::new(16);
    for i in 0..10 {
        cache.insert(i, format!("value-{i}"));
    }
    let removed = cache.remove_if(|_, _| true);
    assert_eq!(removed, 10);
    assert_eq!(cache.len(), 0);
    assert!(cache.is_empty());
    cache.check_invariants().unwrap();
}

#[test]
fn remove_if_predicate_sees_keys_and_values() {
    let cache: ConcurrentLruCache<u32, String> = ConcurrentLruCache::new(16);
    for i in 0..10 {
        cache.insert(i, format!("value-{i}"));
    }
    let removed = cache.remove_if(|key, value| *key < 3 || value.ends_with('9'));
    assert_eq!(removed, 4); // keys 0, 1, 2 and 9
    assert_eq!(cache.len(), 6);
    assert!(!cache.contains(&9));
    assert!(cache.contains(&5));
}

#[test]
fn removed_entries_free_capacity_for_later_inserts() {
    let cache: ConcurrentLruCache<u32, u32> = ConcurrentLruCache::new(4);
    for i in 0..4 {
        cache.insert(i, i);
    }
    cache.remove_if(|key, _| key % 2 == 0); // drops 0 and 2
    assert_eq!(cache.len(), 2);

    // Two inserts fit without evicting the survivors.
    assert!(cache.insert(10, 10).is_none());
    assert!(cache.insert(11, 11).is_none());
    assert!(cache.contains(&1));
    assert!(cache.contains(&3));
}

#[test]
fn shrink_retains_most_recently_accessed_keys() {
    let cache: ConcurrentLruCache<u32, u32> = ConcurrentLruCache::new(6);
    for i in 0..6 {
        cache.insert(i, i);
    }
    // Recency, oldest to newest, is now 0,1,2,5,3,4 after these touches:
    cache.get(&3);
    cache.get(&4);

    cache.set_capacity(3).unwrap();
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.capacity(), 3);
    for key in [5, 3, 4] {
        assert!(cache.contains(&key), "expected key {key} to survive shrink");
    }
    cache.check_invariants().unwrap();
}

#[test]
fn set_capacity_zero_fails_and_changes_nothing() {
    let cache: ConcurrentLruCache<u32, u32> = ConcurrentLruCache::new(4);
    cache.insert(1, 1);
    assert!(cache.set_capacity(0).is_err());
    assert_eq!(cache.capacity(), 4);
    assert_eq!(cache.len(), 1);
}

#[test]
fn try_new_zero_capacity_is_config_error() {
    assert!(ConcurrentLruCache::<u32, u32>::try_new(0).is_err());
    assert!(ConcurrentLruCache::<u32, u32>::try_new(1).is_ok());
}

#[test]
fn keys_snapshot_and_for_each() {
    let cache: ConcurrentLruCache<u32, u32> = ConcurrentLruCache::new(8);
    for i in 0..5 {
        cache.insert(i, i * 2);
    }

    let mut keys = cache.keys();
    keys.sort_unstable();
    assert_eq!(keys, vec![0, 1, 2, 3, 4]);

    let mut sum = 0;
    cache.for_each(|v| sum += *v);
    assert_eq!(sum, 2 * (0 + 1 + 2 + 3 + 4));
}

#[test]
fn self_keyed_cache_round_trip() {
    let cache: ConcurrentLruCache<String, String> = ConcurrentLruCache::new(2);
    cache.cache("alpha".to_string());
    cache.cache("beta".to_string());
    let evicted = cache.cache("gamma".to_string());
    assert_eq!(evicted.as_deref(), Some(&"alpha".to_string()));
    assert_eq!(cache.get(&"beta".to_string()).as_deref(), Some(&"beta".to_string()));
}

#[test]
fn shared_value_survives_eviction() {
    let cache: ConcurrentLruCache<u32, Vec<u8>> = ConcurrentLruCache::new(1);
    cache.insert(1, vec![1, 2, 3]);
    let held = cache.get(&1).unwrap();

    cache.insert(2, vec![4]); // evicts key 1
    assert!(!cache.contains(&1));
    assert_eq!(*held, vec![1, 2, 3]); // caller's handle still valid
}

// Walkthrough: capacity 3, insert a/b/c, touch a, insert d evicts b.
#[test]
fn capacity_three_scenario() {
    let cache: ConcurrentLruCache<&str, i32> = ConcurrentLruCache::new(3);
    cache.insert("a", 1);
    cache.insert("b", 2);
    cache.insert("c", 3);
    assert_eq!(cache.len(), 3);

    assert_eq!(cache.get(&"a").as_deref(), Some(&1));

    let evicted = cache.insert("d", 4);
    assert_eq!(evicted.as_deref(), Some(&2));
    assert_eq!(cache.len(), 3);

    assert_eq!(cache.get(&"b"), None);
    let snap = cache.stats();
    assert_eq!(snap.accesses, 2);
    assert_eq!(snap.hits, 1);

    let mut keys = cache.keys();
    keys.sort_unstable();
    assert_eq!(keys, vec!["a", "c", "d"]);
}
