//! Bounded memo tables for the lookup hot paths.

use fnv::FnvHashMap;
use log::trace;
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::mem;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// How many times the young generation was retired.
    pub swaps: u64,
}

/// A two-generation cache.
///
/// New entries go into the young generation. When it has absorbed
/// `capacity` writes, it becomes the old generation and the previous old
/// generation is dropped. A hit in the old generation moves the entry back
/// into the young one. At most about `2 * capacity` entries are kept.
#[derive(Clone, Debug)]
pub struct GenerationalCache<K, V> {
    gen0: FnvHashMap<K, V>,
    gen1: FnvHashMap<K, V>,
    capacity: usize,
    count: usize,
    stats: CacheStats,
}

impl<K: Hash + Eq, V: Clone> GenerationalCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        GenerationalCache {
            gen0: FnvHashMap::default(),
            gen1: FnvHashMap::default(),
            capacity: capacity.max(1),
            count: 0,
            stats: CacheStats::default(),
        }
    }

    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Some(value) = self.gen0.get(key) {
            self.stats.hits += 1;
            return Some(value.clone());
        }
        if let Some((key, value)) = self.gen1.remove_entry(key) {
            self.stats.hits += 1;
            self.gen0.insert(key, value.clone());
            self.count += 1;
            return Some(value);
        }
        self.stats.misses += 1;
        None
    }

    pub fn set(&mut self, key: K, value: V) {
        if self.count >= self.capacity {
            self.rotate();
        }
        self.gen0.insert(key, value);
        self.count += 1;
    }

    fn rotate(&mut self) {
        trace!("cache generation full after {} writes", self.count);
        self.gen1 = mem::take(&mut self.gen0);
        self.count = 0;
        self.stats.swaps += 1;
    }

    pub fn len(&self) -> usize {
        self.gen0.len() + self.gen1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.gen0.clear();
        self.gen1.clear();
        self.count = 0;
    }
}

/// A `GenerationalCache` bound to the function that fills it.
pub struct AutoCache<K, V, F> {
    cache: GenerationalCache<K, V>,
    compute: F,
}

impl<K, V, F> AutoCache<K, V, F>
where
    K: Hash + Eq + Clone,
    V: Clone,
    F: Fn(&K) -> V,
{
    pub fn new(compute: F, capacity: usize) -> Self {
        AutoCache {
            cache: GenerationalCache::new(capacity),
            compute,
        }
    }

    pub fn get(&mut self, key: &K) -> V {
        if let Some(value) = self.cache.get(key) {
            return value;
        }
        let value = (self.compute)(key);
        self.cache.set(key.clone(), value.clone());
        value
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl<K, V, F> fmt::Debug for AutoCache<K, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoCache")
            .field("stats", &self.cache.stats)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_get_set() {
        let mut cache = GenerationalCache::new(10);
        assert_eq!(None, cache.get("a"));
        cache.set("a".to_string(), 1);
        assert_eq!(Some(1), cache.get("a"));
        assert_eq!(
            CacheStats {
                hits: 1,
                misses: 1,
                swaps: 0
            },
            cache.stats()
        );
    }

    #[test]
    fn test_rotation_is_bounded() {
        let mut cache = GenerationalCache::new(2);
        cache.set(1, 'a');
        cache.set(2, 'b');
        cache.set(3, 'c');
        assert_eq!(1, cache.stats().swaps);
        assert_eq!(3, cache.len());
        cache.set(4, 'd');
        cache.set(5, 'e');
        assert_eq!(2, cache.stats().swaps);
        // 1 and 2 were in the retired generation.
        assert_eq!(None, cache.get(&1));
        assert_eq!(None, cache.get(&2));
        assert_eq!(Some('c'), cache.get(&3));
        assert!(cache.len() <= 4);
    }

    #[test]
    fn test_old_generation_hit_is_promoted() {
        let mut cache = GenerationalCache::new(2);
        cache.set(1, 'a');
        cache.set(2, 'b');
        cache.set(3, 'c');
        // 1 now lives in the old generation.
        assert_eq!(Some('a'), cache.get(&1));
        cache.set(4, 'd');
        cache.set(5, 'e');
        // The promotion survived the next rotation.
        assert_eq!(Some('a'), cache.get(&1));
    }

    #[test]
    fn test_overwrite_counts_as_write() {
        let mut cache = GenerationalCache::new(2);
        cache.set(1, 'a');
        cache.set(1, 'b');
        assert_eq!(0, cache.stats().swaps);
        cache.set(2, 'c');
        assert_eq!(1, cache.stats().swaps);
        assert_eq!(Some('b'), cache.get(&1));
        assert_eq!(Some('c'), cache.get(&2));
    }

    #[test]
    fn test_auto_cache() {
        let calls = Cell::new(0);
        let mut cache = AutoCache::new(
            |n: &u32| {
                calls.set(calls.get() + 1);
                n * 2
            },
            10,
        );
        assert_eq!(4, cache.get(&2));
        assert_eq!(4, cache.get(&2));
        assert_eq!(6, cache.get(&3));
        assert_eq!(2, calls.get());
        assert_eq!(1, cache.stats().hits);
        assert_eq!(2, cache.stats().misses);
    }
}
