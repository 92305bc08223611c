// Path: crates/crypto/src/sign/bitarray.rs

use crate::error::CryptoError;
use bitvec::prelude::*;

/// A compact, most-significant-bit-first bit array marking which
/// constituent keys of a multisig produced a signature.
///
/// The logical length is `elems.len() * 8` when `extra_bits_stored == 0`,
/// otherwise `(elems.len() - 1) * 8 + extra_bits_stored`. Bits past the
/// logical length must be zero.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CompactBitArray {
    extra_bits_stored: u32,
    elems: Vec<u8>,
}

impl CompactBitArray {
    /// Creates an all-zero array of `bits` logical bits.
    pub fn new(bits: usize) -> Self {
        Self {
            extra_bits_stored: (bits % 8) as u32,
            elems: vec![0u8; bits.div_ceil(8)],
        }
    }

    /// Rebuilds an array from its wire fields, rejecting inconsistent encodings.
    pub fn from_raw(extra_bits_stored: u32, elems: Vec<u8>) -> Result<Self, CryptoError> {
        if extra_bits_stored >= 8 {
            return Err(CryptoError::MalformedBitArray(format!(
                "extra_bits_stored {extra_bits_stored} must be below 8"
            )));
        }
        if elems.is_empty() && extra_bits_stored != 0 {
            return Err(CryptoError::MalformedBitArray(
                "extra bits declared without any bytes".into(),
            ));
        }
        let arr = Self {
            extra_bits_stored,
            elems,
        };
        let len = arr.len();
        if arr
            .elems
            .view_bits::<Msb0>()
            .get(len..)
            .is_some_and(|padding| padding.any())
        {
            return Err(CryptoError::MalformedBitArray("non-zero padding bits".into()));
        }
        Ok(arr)
    }

    /// The logical number of bits.
    pub fn len(&self) -> usize {
        if self.extra_bits_stored == 0 {
            self.elems.len() * 8
        } else {
            self.elems.len().saturating_sub(1) * 8 + self.extra_bits_stored as usize
        }
    }

    /// Returns true if the array holds no bits.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns bit `index`, or false when out of range.
    pub fn get(&self, index: usize) -> bool {
        index < self.len()
            && self
                .elems
                .view_bits::<Msb0>()
                .get(index)
                .is_some_and(|bit| *bit)
    }

    /// Sets bit `index`. Returns false, leaving the array untouched, when out of range.
    pub fn set(&mut self, index: usize, value: bool) -> bool {
        if index >= self.len() {
            return false;
        }
        match self.elems.view_bits_mut::<Msb0>().get_mut(index) {
            Some(mut bit) => {
                *bit = value;
                true
            }
            None => false,
        }
    }

    /// Number of set bits within the logical length.
    pub fn count_ones(&self) -> usize {
        self.elems
            .view_bits::<Msb0>()
            .get(..self.len())
            .map_or(0, |bits| bits.count_ones())
    }

    /// The number of meaningful bits in the final byte (0 means all eight).
    pub fn extra_bits_stored(&self) -> u32 {
        self.extra_bits_stored
    }

    /// The packed bytes.
    pub fn elems(&self) -> &[u8] {
        &self.elems
    }
}
