// Path: crates/api/src/state/accessor.rs
//! A dyn-safe trait for state access within decorators and keepers.

use ante_types::codec;
use ante_types::error::StateError;
use parity_scale_codec::{Decode, Encode};

/// Key/value access to chain state.
///
/// Implemented by the committed store, by copy-on-write overlays and by the
/// read-set recorder, so a decorator never knows which layer it is writing to.
pub trait StateAccess: Send + Sync {
    /// Gets a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError>;
    /// Inserts a key-value pair.
    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError>;
    /// Deletes a key-value pair.
    fn delete(&mut self, key: &[u8]) -> Result<(), StateError>;
    /// Sets multiple key-value pairs in a single batch operation.
    fn batch_set(&mut self, updates: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StateError> {
        for (key, value) in updates {
            self.insert(key, value)?;
        }
        Ok(())
    }
    /// Returns every pair whose key starts with `prefix`, in key order.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StateError>;
}

/// Reads and decodes a SCALE value.
pub fn read_value<T: Decode>(state: &dyn StateAccess, key: &[u8]) -> Result<Option<T>, StateError> {
    match state.get(key)? {
        Some(bytes) => codec::from_bytes_canonical(&bytes)
            .map(Some)
            .map_err(StateError::Decode),
        None => Ok(None),
    }
}

/// Encodes and writes a SCALE value.
pub fn write_value<T: Encode>(
    state: &mut dyn StateAccess,
    key: &[u8],
    value: &T,
) -> Result<(), StateError> {
    state.insert(key, &codec::to_bytes_canonical(value))
}
