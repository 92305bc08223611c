// Path: crates/tx/src/tx.rs
//! The decoded, structurally valid transaction.

use crate::msg::{MessageContainer, Msg, SdkMsg};
use crate::proto::{self, Any};
use crate::pubkey::{self, ModeInfoData};
use ante_crypto::{PublicKey, SignatureData};
use ante_types::app::{Address, Coins};
use ante_types::error::TxError;
use prost::Message;

/// The fee a transaction offers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fee {
    /// The offered amount.
    pub amount: Coins,
    /// The gas budget for the whole admission attempt.
    pub gas_limit: u64,
    /// Overrides the first signer as the paying account. Must be a signer.
    pub payer: Option<Address>,
    /// An account whose fee allowance pays instead of the payer.
    pub granter: Option<Address>,
}

/// One signer as declared in the auth info.
#[derive(Debug, Clone, PartialEq)]
pub struct SignerInfoData {
    /// The public key, still in wire form. Parsed after the size charge.
    pub public_key: Option<Any>,
    /// The signing-mode shape.
    pub mode_info: ModeInfoData,
    /// The sequence the signer claims to be at.
    pub sequence: u64,
}

impl SignerInfoData {
    /// Parses the supplied public key, if any.
    pub fn public_key(&self, max_depth: usize) -> Result<Option<PublicKey>, TxError> {
        self.public_key
            .as_ref()
            .map(|any| pubkey::public_key_from_any(any, max_depth))
            .transpose()
    }
}

/// A transaction that passed wire decoding.
///
/// Every message container is resolved. Counts and sizes are within the
/// decoder's bounds. Nothing cryptographic has been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTx {
    /// Length of the raw wire bytes.
    pub raw_len: usize,
    /// SHA-256 of the raw wire bytes.
    pub hash: [u8; 32],
    /// The body exactly as signed.
    pub body_bytes: Vec<u8>,
    /// The auth info exactly as signed.
    pub auth_info_bytes: Vec<u8>,
    /// The messages, in order.
    pub messages: Vec<MessageContainer>,
    /// Free-form note.
    pub memo: String,
    /// Last height at which the tx may be included. Zero means none.
    pub timeout_height: u64,
    /// One entry per signer.
    pub signer_infos: Vec<SignerInfoData>,
    /// The offered fee.
    pub fee: Fee,
    /// Raw signatures, positionally matching `signer_infos`.
    pub signatures: Vec<Vec<u8>>,
}

impl DecodedTx {
    /// The resolved messages.
    pub fn msgs(&self) -> Result<Vec<&Msg>, TxError> {
        self.messages.iter().map(MessageContainer::msg).collect()
    }

    /// The distinct required signers, in order of first appearance. An
    /// explicit fee payer that no message names is appended last.
    pub fn signers(&self) -> Result<Vec<Address>, TxError> {
        let mut out: Vec<Address> = Vec::new();
        for msg in self.msgs()? {
            for signer in msg.signers()? {
                if !out.contains(&signer) {
                    out.push(signer);
                }
            }
        }
        if let Some(payer) = self.fee.payer {
            if !out.contains(&payer) {
                out.push(payer);
            }
        }
        Ok(out)
    }

    /// The account paying the fee: the explicit payer or the first signer.
    pub fn fee_payer(&self) -> Result<Address, TxError> {
        if let Some(payer) = self.fee.payer {
            return Ok(payer);
        }
        self.signers()?
            .first()
            .copied()
            .ok_or_else(|| TxError::Validation("transaction has no signers".into()))
    }

    /// The `SIGN_MODE_DIRECT` sign bytes for one signer's account number.
    pub fn sign_bytes(&self, chain_id: &str, account_number: u64) -> Vec<u8> {
        proto::SignDoc {
            body_bytes: self.body_bytes.clone(),
            auth_info_bytes: self.auth_info_bytes.clone(),
            chain_id: chain_id.to_string(),
            account_number,
        }
        .encode_to_vec()
    }

    /// Pairs signer `index`'s mode info with its raw signature.
    pub fn signature_data(&self, index: usize) -> Result<SignatureData, TxError> {
        let info = self
            .signer_infos
            .get(index)
            .ok_or_else(|| TxError::Unauthorized(format!("no signer info at {index}")))?;
        let raw = self
            .signatures
            .get(index)
            .ok_or_else(|| TxError::Unauthorized(format!("no signature at {index}")))?;
        pubkey::signature_data(&info.mode_info, raw)
    }

    /// The hash as lowercase hex.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}
