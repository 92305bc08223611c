// Path: crates/crypto/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]
//! # Ante Cryptography
//!
//! Signature primitives used by the admission pipeline: raw ed25519 keys,
//! nested threshold multisig keys with compact bit-array signatures, and a
//! batch verifier that reports exact per-slot results.

pub mod error;
pub mod sign;

pub use error::CryptoError;
pub use sign::{
    batch::BatchVerifier,
    bitarray::CompactBitArray,
    ed25519::{Ed25519Keypair, Ed25519PublicKey},
    multisig::MultisigPublicKey,
    PublicKey, SignatureData,
};
