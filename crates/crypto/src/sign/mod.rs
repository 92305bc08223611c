// Path: crates/crypto/src/sign/mod.rs
//! Public keys, signature payloads and verification.

pub mod batch;
pub mod bitarray;
pub mod ed25519;
pub mod multisig;

#[cfg(test)]
mod tests;

use crate::error::CryptoError;
use ante_types::app::Address;
use bitarray::CompactBitArray;
use ed25519::Ed25519PublicKey;
use multisig::MultisigPublicKey;
use parity_scale_codec::{Decode, Encode};

/// A public key an account can be bound to.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub enum PublicKey {
    /// A raw ed25519 key.
    #[codec(index = 0)]
    Ed25519(Ed25519PublicKey),
    /// A threshold multisig over nested keys.
    #[codec(index = 1)]
    Multisig(MultisigPublicKey),
}

/// The signature payload matching a [`PublicKey`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignatureData {
    /// A single raw signature.
    Single(Vec<u8>),
    /// One signature per set bit, in key order.
    Multi {
        /// Marks which constituent keys signed.
        bitarray: CompactBitArray,
        /// The constituent signatures.
        signatures: Vec<SignatureData>,
    },
}

impl PublicKey {
    /// The canonical byte encoding, which is also the address preimage.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode()
    }

    /// The account address controlled by this key.
    pub fn address(&self) -> Address {
        Address::from_public_key_bytes(&self.to_bytes())
    }

    /// A short name for logs and events.
    pub fn type_name(&self) -> &'static str {
        match self {
            PublicKey::Ed25519(_) => "ed25519",
            PublicKey::Multisig(_) => "multisig",
        }
    }

    /// Number of leaf keys, counting multisig constituents recursively.
    pub fn key_count(&self) -> usize {
        match self {
            PublicKey::Ed25519(_) => 1,
            PublicKey::Multisig(m) => m.keys().iter().map(PublicKey::key_count).sum(),
        }
    }

    /// Nesting depth: 1 for a plain key, 1 + the deepest child for a multisig.
    pub fn depth(&self) -> usize {
        match self {
            PublicKey::Ed25519(_) => 1,
            PublicKey::Multisig(m) => 1 + m.keys().iter().map(PublicKey::depth).max().unwrap_or(0),
        }
    }

    /// Checks the structure of `sig` against this key and returns every
    /// (leaf key, leaf signature) pair that must verify for the whole
    /// signature to be valid. No cryptographic work is performed.
    pub fn leaf_signatures<'a>(
        &'a self,
        sig: &'a SignatureData,
    ) -> Result<Vec<(&'a Ed25519PublicKey, &'a [u8])>, CryptoError> {
        let mut out = Vec::new();
        self.collect_leaves(sig, &mut out)?;
        Ok(out)
    }

    fn collect_leaves<'a>(
        &'a self,
        sig: &'a SignatureData,
        out: &mut Vec<(&'a Ed25519PublicKey, &'a [u8])>,
    ) -> Result<(), CryptoError> {
        match (self, sig) {
            (PublicKey::Ed25519(pk), SignatureData::Single(bytes)) => {
                out.push((pk, bytes.as_slice()));
                Ok(())
            }
            (PublicKey::Multisig(m), SignatureData::Multi { bitarray, signatures }) => {
                for (key, sub) in m.signed_pairs(bitarray, signatures)? {
                    key.collect_leaves(sub, out)?;
                }
                Ok(())
            }
            (PublicKey::Ed25519(_), SignatureData::Multi { .. }) => {
                Err(CryptoError::Mismatch("multi signature for single key"))
            }
            (PublicKey::Multisig(_), SignatureData::Single(_)) => {
                Err(CryptoError::Mismatch("single signature for multisig key"))
            }
        }
    }

    /// Verifies `sig` over `msg`, structurally and cryptographically.
    pub fn verify(&self, msg: &[u8], sig: &SignatureData) -> Result<(), CryptoError> {
        for (pk, bytes) in self.leaf_signatures(sig)? {
            if !pk.verify(msg, bytes) {
                return Err(CryptoError::VerificationFailed);
            }
        }
        Ok(())
    }

    /// Gas for verifying `sig`: `cost_per_sig` for each signature present.
    ///
    /// Multisig keys are walked over their validated key count, never over a
    /// length taken from the signature.
    pub fn verification_gas(&self, sig: &SignatureData, cost_per_sig: u64) -> Result<u64, CryptoError> {
        match (self, sig) {
            (PublicKey::Ed25519(_), SignatureData::Single(_)) => Ok(cost_per_sig),
            (PublicKey::Multisig(m), SignatureData::Multi { bitarray, signatures }) => {
                let mut total: u64 = 0;
                for (key, sub) in m.signed_pairs(bitarray, signatures)? {
                    total = total.saturating_add(key.verification_gas(sub, cost_per_sig)?);
                }
                Ok(total)
            }
            _ => Err(CryptoError::Mismatch("signature shape does not match key")),
        }
    }
}

impl SignatureData {
    /// Total number of leaf signatures.
    pub fn leaf_count(&self) -> usize {
        match self {
            SignatureData::Single(_) => 1,
            SignatureData::Multi { signatures, .. } => {
                signatures.iter().map(SignatureData::leaf_count).sum()
            }
        }
    }
}
