// Path: crates/state/src/backend.rs
//! The long-term key/value engine contract and an in-memory engine.

use ante_types::error::StateError;
use std::collections::BTreeMap;

/// A durable key/value engine.
///
/// The pipeline only needs point reads, ordered prefix scans and atomic batch
/// writes; the on-disk format is the engine's business.
pub trait KvBackend: Send + Sync {
    /// Reads one key.
    fn read(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError>;

    /// Returns every pair under `prefix` in key order.
    fn scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StateError>;

    /// Applies inserts and deletes atomically.
    fn write_batch(&mut self, inserts: &[(Vec<u8>, Vec<u8>)], deletes: &[Vec<u8>]) -> Result<(), StateError>;
}

/// A `BTreeMap` engine for tests and single-process nodes.
#[derive(Debug, Default, Clone)]
pub struct MemBackend {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemBackend {
    /// An empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl KvBackend for MemBackend {
    fn read(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.data.get(key).cloned())
    }

    fn scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StateError> {
        Ok(self
            .data
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn write_batch(&mut self, inserts: &[(Vec<u8>, Vec<u8>)], deletes: &[Vec<u8>]) -> Result<(), StateError> {
        for k in deletes {
            self.data.remove(k);
        }
        for (k, v) in inserts {
            self.data.insert(k.clone(), v.clone());
        }
        Ok(())
    }
}
