// Path: crates/state/src/cache.rs
//! A bounded read-through cache shared by concurrent admission workers.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Hit and miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads answered from the cache.
    pub hits: u64,
    /// Reads that went to the loader.
    pub misses: u64,
}

/// An LRU cache of committed values, absent keys included.
///
/// An LRU read promotes the entry, so every operation, reads included, takes
/// the one exclusive lock. A read miss keeps the lock while it loads so that a
/// concurrent update can never be overwritten by the value it replaced.
pub struct ReadThroughCache {
    entries: Mutex<LruCache<Vec<u8>, Option<Vec<u8>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ReadThroughCache {
    /// A cache holding at most `capacity` keys. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<Vec<u8>, Option<Vec<u8>>>> {
        // A panicking loader cannot leave the map half-written, so a poisoned
        // lock is still consistent.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns the cached value for `key`, or loads, stores and returns it.
    pub fn get_or_load<E>(
        &self,
        key: &[u8],
        load: impl FnOnce(&[u8]) -> Result<Option<Vec<u8>>, E>,
    ) -> Result<Option<Vec<u8>>, E> {
        let mut entries = self.lock();
        if let Some(value) = entries.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(value.clone());
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = load(key)?;
        entries.put(key.to_vec(), value.clone());
        Ok(value)
    }

    /// Records a committed write. `None` records a delete.
    pub fn update(&self, key: &[u8], value: Option<Vec<u8>>) {
        self.lock().put(key.to_vec(), value);
    }

    /// Drops `key` from the cache.
    pub fn invalidate(&self, key: &[u8]) {
        self.lock().pop(key);
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Current hit and miss counts.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
