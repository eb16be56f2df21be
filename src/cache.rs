use std::hash::Hash;

use hashbrown::HashMap;
use log::warn;

/// Minimal cache interface for the line solutions.
pub trait Cached<K, V> {
    fn cache_get(&mut self, key: &K) -> Option<&V>;
    fn cache_set(&mut self, key: K, val: V);
    fn cache_size(&self) -> usize;
    fn cache_hits(&self) -> u32;
    fn cache_misses(&self) -> u32;
}

/// Hash-map cache that drops all entries when full,
/// optionally growing its capacity on every overflow.
#[derive(Default)]
pub struct GrowableCache<K, V>
where
    K: Eq + Hash,
{
    store: HashMap<K, V>,
    capacity: usize,
    increase_in: u8,
    max_size: usize,
    hits: u32,
    misses: u32,
}

impl<K: Hash + Eq, V> GrowableCache<K, V> {
    pub fn with_capacity(size: usize) -> Self {
        Self::with_capacity_and_increase(size, 1)
    }

    pub fn with_capacity_and_increase(size: usize, increase_in: u8) -> Self {
        Self {
            store: HashMap::with_capacity(size),
            capacity: size,
            increase_in,
            max_size: size * 10,
            hits: 0,
            misses: 0,
        }
    }

    fn increase_size(&mut self) {
        if self.capacity >= self.max_size {
            return;
        }

        if self.increase_in > 1 {
            let new_capacity = self.capacity * usize::from(self.increase_in);
            self.capacity = new_capacity.min(self.max_size);
        }
    }
}

impl<K: Hash + Eq, V> Cached<K, V> for GrowableCache<K, V> {
    fn cache_get(&mut self, key: &K) -> Option<&V> {
        if let Some(v) = self.store.get(key) {
            self.hits += 1;
            Some(v)
        } else {
            self.misses += 1;
            None
        }
    }

    fn cache_set(&mut self, key: K, val: V) {
        if self.store.len() >= self.capacity {
            warn!("Maximum size for cache reached ({}).", self.capacity);
            self.store.clear();
            self.increase_size();
        }
        let _ = self.store.insert(key, val);
    }

    fn cache_size(&self) -> usize {
        self.store.len()
    }

    fn cache_hits(&self) -> u32 {
        self.hits
    }

    fn cache_misses(&self) -> u32 {
        self.misses
    }
}

/// (size, hits, hit rate) of the given cache.
pub fn cache_info<K, V>(cache: &dyn Cached<K, V>) -> (usize, u32, f32)
where
    K: Hash + Eq,
{
    if cache.cache_size() > 0 {
        let hits = cache.cache_hits();
        let misses = cache.cache_misses();
        let hit_rate = if hits == 0 {
            0.0
        } else {
            hits as f32 / (hits + misses) as f32
        };

        (cache.cache_size(), hits, hit_rate)
    } else {
        (0, 0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_hits_and_misses() {
        let mut cache = GrowableCache::with_capacity(4);

        assert_eq!(cache.cache_get(&1), None);
        cache.cache_set(1, "one");
        assert_eq!(cache.cache_get(&1), Some(&"one"));
        assert_eq!(cache.cache_get(&2), None);

        assert_eq!(cache.cache_hits(), 1);
        assert_eq!(cache.cache_misses(), 2);
    }

    #[test]
    fn clear_when_full() {
        let mut cache = GrowableCache::with_capacity(2);
        cache.cache_set(1, ());
        cache.cache_set(2, ());
        assert_eq!(cache.cache_size(), 2);

        cache.cache_set(3, ());
        assert_eq!(cache.cache_size(), 1);
        assert_eq!(cache.cache_get(&1), None);
        assert_eq!(cache.cache_get(&3), Some(&()));
    }
}
