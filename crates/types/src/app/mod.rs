// Path: crates/types/src/app/mod.rs
//! Core application-level value types shared by every pipeline stage.

mod address;
mod coin;
mod events;
mod mode;

pub use address::*;
pub use coin::*;
pub use events::*;
pub use mode::*;

use sha2::{Digest, Sha256};

/// Computes the SHA-256 digest of `data`.
pub fn sha256(data: impl AsRef<[u8]>) -> [u8; 32] {
    Sha256::digest(data.as_ref()).into()
}

/// A transaction hash: the SHA-256 of the raw wire bytes.
pub fn tx_hash(raw: &[u8]) -> [u8; 32] {
    sha256(raw)
}
