// Path: crates/tx/src/pubkey.rs
//! Conversion between wire-encoded public keys and signatures and the
//! validated types in `ante-crypto`.

use crate::proto::{self, Any};
use crate::unknown_fields;
use crate::msg::decode_strict;
use ante_crypto::{CompactBitArray, Ed25519PublicKey, MultisigPublicKey, PublicKey, SignatureData};
use ante_types::error::TxError;

/// Type identifier of an ed25519 public key.
pub const ED25519_PUBKEY_TYPE_URL: &str = "/ante.crypto.ed25519.PubKey";
/// Type identifier of a threshold multisig public key.
pub const MULTISIG_PUBKEY_TYPE_URL: &str = "/ante.crypto.multisig.LegacyAminoPubKey";

/// The signing-mode shape of one signer, mirroring its key shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeInfoData {
    /// A single `SIGN_MODE_DIRECT` signature.
    Single,
    /// One nested mode per set bit.
    Multi {
        /// Which constituent keys signed.
        bitarray: CompactBitArray,
        /// The mode of each constituent signature, in key order.
        mode_infos: Vec<ModeInfoData>,
    },
}

/// Decodes a public key, enforcing the multisig threshold bounds and the
/// nesting limit.
pub fn public_key_from_any(any: &Any, max_depth: usize) -> Result<PublicKey, TxError> {
    public_key_at_depth(any, 1, max_depth)
}

fn public_key_at_depth(any: &Any, depth: usize, max_depth: usize) -> Result<PublicKey, TxError> {
    if depth > max_depth {
        return Err(TxError::LimitExceeded(format!(
            "public key nesting depth {depth} exceeds {max_depth}"
        )));
    }
    match any.type_url.as_str() {
        ED25519_PUBKEY_TYPE_URL => {
            let raw: proto::Ed25519PubKey =
                decode_strict(&any.value, unknown_fields::ED25519_PUB_KEY)?;
            Ok(PublicKey::Ed25519(Ed25519PublicKey::from_slice(&raw.key)?))
        }
        MULTISIG_PUBKEY_TYPE_URL => {
            let raw: proto::LegacyAminoPubKey =
                decode_strict(&any.value, unknown_fields::LEGACY_AMINO_PUB_KEY)?;
            let keys = raw
                .public_keys
                .iter()
                .map(|k| public_key_at_depth(k, depth + 1, max_depth))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(PublicKey::Multisig(MultisigPublicKey::new(raw.threshold, keys)?))
        }
        other => Err(TxError::Unauthorized(format!("unsupported public key type '{other}'"))),
    }
}

/// Encodes a public key for the wire.
pub fn public_key_to_any(key: &PublicKey) -> Any {
    match key {
        PublicKey::Ed25519(pk) => crate::msg::pack(
            ED25519_PUBKEY_TYPE_URL,
            &proto::Ed25519PubKey {
                key: pk.as_bytes().to_vec(),
            },
        ),
        PublicKey::Multisig(m) => crate::msg::pack(
            MULTISIG_PUBKEY_TYPE_URL,
            &proto::LegacyAminoPubKey {
                threshold: m.threshold(),
                public_keys: m.keys().iter().map(public_key_to_any).collect(),
            },
        ),
    }
}

/// Converts a wire mode info, accepting only `SIGN_MODE_DIRECT` leaves.
pub fn mode_info_from_proto(mode: &proto::ModeInfo, max_depth: usize) -> Result<ModeInfoData, TxError> {
    mode_info_at_depth(mode, 1, max_depth)
}

fn mode_info_at_depth(mode: &proto::ModeInfo, depth: usize, max_depth: usize) -> Result<ModeInfoData, TxError> {
    if depth > max_depth {
        return Err(TxError::LimitExceeded(format!(
            "mode info nesting depth {depth} exceeds {max_depth}"
        )));
    }
    match &mode.sum {
        Some(proto::mode_info::Sum::Single(single)) => {
            match proto::SignMode::try_from(single.mode) {
                Ok(proto::SignMode::Direct) => Ok(ModeInfoData::Single),
                _ => Err(TxError::Decode(format!("unsupported sign mode {}", single.mode))),
            }
        }
        Some(proto::mode_info::Sum::Multi(multi)) => {
            let raw = multi
                .bitarray
                .as_ref()
                .ok_or_else(|| TxError::Decode("multisig mode info without bit array".into()))?;
            let bitarray = CompactBitArray::from_raw(raw.extra_bits_stored, raw.elems.clone())
                .map_err(|e| TxError::Decode(e.to_string()))?;
            let mode_infos = multi
                .mode_infos
                .iter()
                .map(|m| mode_info_at_depth(m, depth + 1, max_depth))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ModeInfoData::Multi {
                bitarray,
                mode_infos,
            })
        }
        None => Err(TxError::Decode("missing mode info".into())),
    }
}

/// Encodes a mode info for the wire.
pub fn mode_info_to_proto(mode: &ModeInfoData) -> proto::ModeInfo {
    let sum = match mode {
        ModeInfoData::Single => proto::mode_info::Sum::Single(proto::mode_info::Single {
            mode: proto::SignMode::Direct as i32,
        }),
        ModeInfoData::Multi {
            bitarray,
            mode_infos,
        } => proto::mode_info::Sum::Multi(proto::mode_info::Multi {
            bitarray: Some(proto::CompactBitArray {
                extra_bits_stored: bitarray.extra_bits_stored(),
                elems: bitarray.elems().to_vec(),
            }),
            mode_infos: mode_infos.iter().map(mode_info_to_proto).collect(),
        }),
    };
    proto::ModeInfo { sum: Some(sum) }
}

/// Pairs a mode info with the raw signature bytes the envelope carried.
pub fn signature_data(mode: &ModeInfoData, raw: &[u8]) -> Result<SignatureData, TxError> {
    match mode {
        ModeInfoData::Single => Ok(SignatureData::Single(raw.to_vec())),
        ModeInfoData::Multi {
            bitarray,
            mode_infos,
        } => {
            let multi: proto::MultiSignature = decode_strict(raw, unknown_fields::MULTI_SIGNATURE)?;
            if multi.signatures.len() != mode_infos.len() {
                return Err(TxError::Unauthorized(format!(
                    "multisig carries {} signatures for {} mode infos",
                    multi.signatures.len(),
                    mode_infos.len()
                )));
            }
            let signatures = mode_infos
                .iter()
                .zip(&multi.signatures)
                .map(|(m, s)| signature_data(m, s))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(SignatureData::Multi {
                bitarray: bitarray.clone(),
                signatures,
            })
        }
    }
}

/// Encodes a signature for the envelope: raw bytes for a single key, a
/// `MultiSignature` for a multisig.
pub fn signature_to_raw(sig: &SignatureData) -> Vec<u8> {
    use prost::Message;
    match sig {
        SignatureData::Single(bytes) => bytes.clone(),
        SignatureData::Multi { signatures, .. } => proto::MultiSignature {
            signatures: signatures.iter().map(signature_to_raw).collect(),
        }
        .encode_to_vec(),
    }
}
