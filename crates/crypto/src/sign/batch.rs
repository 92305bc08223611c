// Path: crates/crypto/src/sign/batch.rs

use super::ed25519::Ed25519PublicKey;
use crate::error::CryptoError;
use curve25519_dalek::edwards::CompressedEdwardsY;
use ed25519_dalek::{Signature, VerifyingKey};
use rayon::prelude::*;

struct BatchEntry {
    key: VerifyingKey,
    message: Vec<u8>,
    signature: Signature,
}

/// Accumulates ed25519 verifications and checks them together.
///
/// `add` parses eagerly, so a slot exists only for well-formed input. It also
/// applies the R checks of `verify_strict`, which the batch equation skips, so
/// a batch accepts exactly what [`Ed25519PublicKey::verify`] accepts. The
/// combined equation is tried first; if it fails, every slot is verified on
/// its own across the rayon pool so the per-slot results are exact.
#[derive(Default)]
pub struct BatchVerifier {
    entries: Vec<BatchEntry>,
}

impl BatchVerifier {
    /// Creates an empty verifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one verification. On error nothing is queued.
    pub fn add(
        &mut self,
        public_key: &Ed25519PublicKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), CryptoError> {
        let key = public_key.verifying_key()?;
        let signature = Signature::from_slice(signature)
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
        check_commitment(signature.r_bytes())?;
        self.entries.push(BatchEntry {
            key,
            message: message.to_vec(),
            signature,
        });
        Ok(())
    }

    /// Number of queued slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Verifies all queued slots, returning whether every slot passed and
    /// one result per slot in `add` order.
    pub fn verify(&self) -> (bool, Vec<bool>) {
        if self.entries.is_empty() {
            return (true, Vec::new());
        }
        let messages: Vec<&[u8]> = self.entries.iter().map(|e| e.message.as_slice()).collect();
        let signatures: Vec<Signature> = self.entries.iter().map(|e| e.signature).collect();
        let keys: Vec<VerifyingKey> = self.entries.iter().map(|e| e.key).collect();

        if ed25519_dalek::verify_batch(&messages, &signatures, &keys).is_ok() {
            return (true, vec![true; self.entries.len()]);
        }

        tracing::debug!(
            target: "crypto",
            slots = self.entries.len(),
            "batch equation failed, falling back to per-slot verification"
        );
        let per_slot: Vec<bool> = self
            .entries
            .par_iter()
            .map(|e| e.key.verify_strict(&e.message, &e.signature).is_ok())
            .collect();
        (per_slot.iter().all(|ok| *ok), per_slot)
    }
}

/// Rejects an R that is off the curve, of small order, or not in canonical
/// encoding.
fn check_commitment(r: &[u8; 32]) -> Result<(), CryptoError> {
    let point = CompressedEdwardsY(*r)
        .decompress()
        .ok_or_else(|| CryptoError::InvalidSignature("R is not a curve point".into()))?;
    if point.is_small_order() {
        return Err(CryptoError::InvalidSignature("R has small order".into()));
    }
    if point.compress().as_bytes() != r {
        return Err(CryptoError::InvalidSignature("R is not canonically encoded".into()));
    }
    Ok(())
}
