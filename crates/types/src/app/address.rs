// Path: crates/types/src/app/address.rs

use crate::app::sha256;
use crate::error::TxError;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The byte length of an account address.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account address, rendered as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode, Default)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// Wraps raw address bytes.
    pub fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Derives the address that owns `pubkey_bytes`: the first 20 bytes of
    /// the SHA-256 of the key's canonical encoding.
    pub fn from_public_key_bytes(pubkey_bytes: &[u8]) -> Self {
        let digest = sha256(pubkey_bytes);
        let mut out = [0u8; ADDRESS_LEN];
        out.copy_from_slice(&digest[..ADDRESS_LEN]);
        Self(out)
    }

    /// Derives the address of a named module account, which no key can sign for.
    pub fn module(name: &str) -> Self {
        Self::from_public_key_bytes(format!("module:{name}").as_bytes())
    }

    /// Returns the raw address bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Parses an address from a hex string, mapping failures to `TxError::InvalidAddress`.
    pub fn parse(s: &str) -> Result<Self, TxError> {
        s.parse()
    }
}

impl FromStr for Address {
    type Err = TxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TxError::InvalidAddress("empty address string".into()));
        }
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(raw).map_err(|e| TxError::InvalidAddress(format!("{s}: {e}")))?;
        let arr: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|b: Vec<u8>| {
            TxError::InvalidAddress(format!(
                "{s}: expected {ADDRESS_LEN} bytes, got {}",
                b.len()
            ))
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
