// Path: crates/crypto/src/sign/multisig.rs

use super::{bitarray::CompactBitArray, PublicKey, SignatureData};
use crate::error::CryptoError;
use parity_scale_codec::{Decode, Encode};

/// A `threshold`-of-`keys.len()` multisig key.
///
/// `1 <= threshold <= keys.len()` holds for every value of this type: the
/// only constructors are [`MultisigPublicKey::new`] and the SCALE decoder,
/// which goes through it. Verification checks the bound again.
#[derive(Clone, Debug, PartialEq, Eq, Encode)]
pub struct MultisigPublicKey {
    threshold: u32,
    keys: Vec<PublicKey>,
}

fn check_threshold(threshold: u32, keys: usize) -> Result<(), CryptoError> {
    if threshold == 0 || threshold as usize > keys {
        return Err(CryptoError::InvalidThreshold { threshold, keys });
    }
    Ok(())
}

impl MultisigPublicKey {
    /// Builds a multisig key, rejecting thresholds outside `[1, keys.len()]`.
    pub fn new(threshold: u32, keys: Vec<PublicKey>) -> Result<Self, CryptoError> {
        check_threshold(threshold, keys.len())?;
        Ok(Self { threshold, keys })
    }

    /// The number of signatures required.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// The ordered constituent keys.
    pub fn keys(&self) -> &[PublicKey] {
        &self.keys
    }

    /// Runs the structural checks on a multisig signature and pairs every set
    /// bit's key with its signature, in key order.
    pub(crate) fn signed_pairs<'a>(
        &'a self,
        bitarray: &CompactBitArray,
        signatures: &'a [SignatureData],
    ) -> Result<Vec<(&'a PublicKey, &'a SignatureData)>, CryptoError> {
        let key_count = self.keys.len();
        if bitarray.len() != key_count {
            return Err(CryptoError::BitArrayLength {
                bits: bitarray.len(),
                keys: key_count,
            });
        }
        check_threshold(self.threshold, key_count)?;
        let set_bits = bitarray.count_ones();
        if signatures.len() != set_bits {
            return Err(CryptoError::SignatureCount {
                sigs: signatures.len(),
                set_bits,
            });
        }
        if set_bits < self.threshold as usize {
            return Err(CryptoError::BelowThreshold {
                set_bits,
                threshold: self.threshold,
            });
        }

        let mut sigs = signatures.iter();
        let mut pairs = Vec::with_capacity(set_bits);
        for (index, key) in self.keys.iter().enumerate() {
            if !bitarray.get(index) {
                continue;
            }
            let sig = sigs.next().ok_or(CryptoError::SignatureCount {
                sigs: signatures.len(),
                set_bits,
            })?;
            pairs.push((key, sig));
        }
        Ok(pairs)
    }
}

impl Decode for MultisigPublicKey {
    fn decode<I: parity_scale_codec::Input>(
        input: &mut I,
    ) -> Result<Self, parity_scale_codec::Error> {
        let threshold = u32::decode(input)?;
        let keys = Vec::<PublicKey>::decode(input)?;
        Self::new(threshold, keys).map_err(|_| "invalid multisig threshold".into())
    }
}
