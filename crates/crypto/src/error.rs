// Path: crates/crypto/src/error.rs
//! Local error types for the `ante-crypto` crate.

use ante_types::error::TxError;
use thiserror::Error;

/// Errors raised while parsing keys or checking signatures.
///
/// Every structural problem with a multisig key or signature is reported
/// through one of these variants; none of them is reachable as a panic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Public key bytes are malformed or describe a weak point.
    #[error("invalid public key: {0}")]
    InvalidKey(String),
    /// Signature bytes are malformed.
    #[error("invalid signature encoding: {0}")]
    InvalidSignature(String),
    /// The signature did not verify.
    #[error("signature verification failed")]
    VerificationFailed,
    /// A multisig threshold outside `[1, key_count]`.
    #[error("invalid multisig threshold {threshold} for {keys} keys")]
    InvalidThreshold {
        /// The threshold carried by the key.
        threshold: u32,
        /// The number of constituent keys.
        keys: usize,
    },
    /// The bit array does not cover exactly one bit per constituent key.
    #[error("bit array size is incorrect, expected: {keys}, got: {bits}")]
    BitArrayLength {
        /// The bit array's logical length.
        bits: usize,
        /// The number of constituent keys.
        keys: usize,
    },
    /// The bit array encoding itself is malformed.
    #[error("malformed bit array: {0}")]
    MalformedBitArray(String),
    /// Number of signatures differs from the number of set bits.
    #[error("signature count {sigs} does not match set bit count {set_bits}")]
    SignatureCount {
        /// Signatures supplied.
        sigs: usize,
        /// Bits set in the bit array.
        set_bits: usize,
    },
    /// Fewer signers than the threshold requires.
    #[error("not enough signatures set, have {set_bits}, expected {threshold}")]
    BelowThreshold {
        /// Bits set in the bit array.
        set_bits: usize,
        /// The required threshold.
        threshold: u32,
    },
    /// The signature shape does not match the key shape.
    #[error("signature type does not match key type: {0}")]
    Mismatch(&'static str),
    /// Multisig keys nest deeper than permitted.
    #[error("multisig nesting depth {depth} exceeds limit {limit}")]
    TooDeep {
        /// Observed nesting depth.
        depth: usize,
        /// Configured limit.
        limit: usize,
    },
}

impl From<CryptoError> for TxError {
    fn from(e: CryptoError) -> Self {
        TxError::Unauthorized(e.to_string())
    }
}
