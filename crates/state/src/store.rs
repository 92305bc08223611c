// Path: crates/state/src/store.rs
//! The committed store: a key/value engine behind the shared read cache.

use crate::backend::{KvBackend, MemBackend};
use crate::cache::{CacheStats, ReadThroughCache};
use ante_api::state::{StateAccess, StateChangeSet};
use ante_types::error::StateError;

/// Committed chain state.
///
/// Point reads go through the [`ReadThroughCache`], so any number of workers
/// holding `&CommittedStore` can read concurrently. Writes go straight to the
/// engine and then refresh the cache.
pub struct CommittedStore {
    backend: Box<dyn KvBackend>,
    cache: ReadThroughCache,
    version: u64,
}

impl CommittedStore {
    /// Wraps `backend` with a cache of `cache_capacity` keys.
    pub fn new(backend: Box<dyn KvBackend>, cache_capacity: usize) -> Self {
        Self {
            backend,
            cache: ReadThroughCache::new(cache_capacity),
            version: 0,
        }
    }

    /// A store over a fresh [`MemBackend`].
    pub fn in_memory(cache_capacity: usize) -> Self {
        Self::new(Box::new(MemBackend::new()), cache_capacity)
    }

    /// Applies a change set as one engine batch and bumps the version.
    pub fn commit(&mut self, changes: StateChangeSet) -> Result<u64, StateError> {
        let (inserts, deletes) = changes;
        self.backend.write_batch(&inserts, &deletes)?;
        for key in &deletes {
            self.cache.update(key, None);
        }
        for (key, value) in inserts {
            self.cache.update(&key, Some(value));
        }
        self.version += 1;
        tracing::debug!(
            target: "cache",
            version = self.version,
            deletes = deletes.len(),
            "committed change set"
        );
        Ok(self.version)
    }

    /// Number of change sets committed so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Read cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl StateAccess for CommittedStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        let backend = &self.backend;
        self.cache.get_or_load(key, |k| backend.read(k))
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.backend.write_batch(&[(key.to_vec(), value.to_vec())], &[])?;
        self.cache.update(key, Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.backend.write_batch(&[], &[key.to_vec()])?;
        self.cache.update(key, None);
        Ok(())
    }

    fn batch_set(&mut self, updates: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StateError> {
        self.backend.write_batch(updates, &[])?;
        for (key, value) in updates {
            self.cache.update(key, Some(value.clone()));
        }
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StateError> {
        self.backend.scan(prefix)
    }
}
