// Path: crates/types/src/codec.rs
//! The canonical binary codec for persisted state.
//!
//! Every value written to state goes through SCALE. Decoding is strict: the
//! whole input must be consumed, so two different byte strings can never
//! decode to the same value.

use parity_scale_codec::{Decode, DecodeAll, Encode};

/// Encodes a value into its canonical byte representation.
pub fn to_bytes_canonical<T: Encode>(value: &T) -> Vec<u8> {
    value.encode()
}

/// Decodes a value from its canonical byte representation.
///
/// Fails if the input is malformed or carries trailing bytes.
pub fn from_bytes_canonical<T: Decode>(bytes: &[u8]) -> Result<T, String> {
    T::decode_all(&mut &*bytes).map_err(|e| e.to_string())
}
