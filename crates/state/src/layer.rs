// Path: crates/state/src/layer.rs
//! Pending write layers held between blocks.

use ante_api::state::{StateAccess, StateChangeSet};
use ante_types::error::StateError;
use std::collections::BTreeMap;

/// Writes accepted since the last block commit but not yet persisted.
///
/// The check-mode and deliver-mode states are each one of these on top of the
/// committed store.
#[derive(Debug, Default, Clone)]
pub struct PendingLayer {
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl PendingLayer {
    /// An empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending keys, deletes included.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Returns true if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Folds an admitted transaction's changes into the layer.
    pub fn absorb(&mut self, changes: StateChangeSet) {
        let (inserts, deletes) = changes;
        for key in deletes {
            self.writes.insert(key, None);
        }
        for (key, value) in inserts {
            self.writes.insert(key, Some(value));
        }
    }

    /// Drains the layer into an ordered change set.
    pub fn take(&mut self) -> StateChangeSet {
        let mut inserts = Vec::new();
        let mut deletes = Vec::new();
        for (key, value) in std::mem::take(&mut self.writes) {
            match value {
                Some(value) => inserts.push((key, value)),
                None => deletes.push(key),
            }
        }
        (inserts, deletes)
    }

    /// Discards every pending write.
    pub fn clear(&mut self) {
        self.writes.clear();
    }

    /// A read-only view of the layer over `base`.
    pub fn view<'a>(&'a self, base: &'a dyn StateAccess) -> LayeredView<'a> {
        LayeredView { layer: self, base }
    }
}

/// A read-only [`StateAccess`] over a pending layer and its base.
pub struct LayeredView<'a> {
    layer: &'a PendingLayer,
    base: &'a dyn StateAccess,
}

impl StateAccess for LayeredView<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        match self.layer.writes.get(key) {
            Some(value) => Ok(value.clone()),
            None => self.base.get(key),
        }
    }

    fn insert(&mut self, _key: &[u8], _value: &[u8]) -> Result<(), StateError> {
        Err(StateError::Backend("layered view is read-only".into()))
    }

    fn delete(&mut self, _key: &[u8]) -> Result<(), StateError> {
        Err(StateError::Backend("layered view is read-only".into()))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StateError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.base.prefix_scan(prefix)?.into_iter().collect();
        for (key, value) in self.layer.writes.range(prefix.to_vec()..) {
            if !key.starts_with(prefix) {
                break;
            }
            match value {
                Some(value) => merged.insert(key.clone(), value.clone()),
                None => merged.remove(key),
            };
        }
        Ok(merged.into_iter().collect())
    }
}
