// Path: crates/api/src/state/read_set.rs

//! Read-set recording for optimistic parallel admission.

use crate::state::StateAccess;
use ante_types::error::StateError;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// The values an admission attempt observed in the base state.
///
/// A key maps to `None` when the attempt observed it as absent. Prefix scans
/// are recorded with their full result so that an insertion under the prefix
/// also invalidates the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadSet {
    reads: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
    scans: BTreeMap<Vec<u8>, Vec<(Vec<u8>, Vec<u8>)>>,
}

impl ReadSet {
    /// Number of distinct keys and prefixes recorded.
    pub fn len(&self) -> usize {
        self.reads.len() + self.scans.len()
    }

    /// Returns true if nothing was read.
    pub fn is_empty(&self) -> bool {
        self.reads.is_empty() && self.scans.is_empty()
    }

    /// Returns true if every recorded read still yields the same value in `state`.
    pub fn is_valid_against(&self, state: &dyn StateAccess) -> Result<bool, StateError> {
        for (key, observed) in &self.reads {
            if state.get(key)? != *observed {
                return Ok(false);
            }
        }
        for (prefix, observed) in &self.scans {
            if state.prefix_scan(prefix)? != *observed {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// A read-only view over a base state that records every value it serves.
///
/// Writes are refused; stack a [`super::StateOverlay`] on top to buffer them.
/// The first observation of a key wins, so a later read of the same key
/// cannot mask a value the attempt already acted upon.
pub struct RecordingState<'a> {
    base: &'a dyn StateAccess,
    recorded: Mutex<ReadSet>,
}

impl<'a> RecordingState<'a> {
    /// Wraps `base`.
    pub fn new(base: &'a dyn StateAccess) -> Self {
        Self {
            base,
            recorded: Mutex::new(ReadSet::default()),
        }
    }

    /// Consumes the recorder and returns what it observed.
    pub fn into_read_set(self) -> ReadSet {
        self.recorded
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn with_set<R>(&self, f: impl FnOnce(&mut ReadSet) -> R) -> R {
        let mut guard = self
            .recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

impl StateAccess for RecordingState<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        let value = self.base.get(key)?;
        self.with_set(|set| {
            set.reads
                .entry(key.to_vec())
                .or_insert_with(|| value.clone());
        });
        Ok(value)
    }

    fn insert(&mut self, _key: &[u8], _value: &[u8]) -> Result<(), StateError> {
        Err(StateError::Backend("recording state is read-only".into()))
    }

    fn delete(&mut self, _key: &[u8]) -> Result<(), StateError> {
        Err(StateError::Backend("recording state is read-only".into()))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StateError> {
        let pairs = self.base.prefix_scan(prefix)?;
        self.with_set(|set| {
            set.scans
                .entry(prefix.to_vec())
                .or_insert_with(|| pairs.clone());
        });
        Ok(pairs)
    }
}
