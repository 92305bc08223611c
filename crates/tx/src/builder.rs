// Path: crates/tx/src/builder.rs
//! Client-side construction and signing of transactions.

use crate::msg::SdkMsg;
use crate::proto::{self, coins_to_proto, Any};
use crate::pubkey::{mode_info_to_proto, public_key_to_any, signature_to_raw, ModeInfoData};
use ante_crypto::{CompactBitArray, Ed25519Keypair, MultisigPublicKey, PublicKey, SignatureData};
use ante_types::app::{Address, Coins};
use prost::Message;

/// A key that can produce a signature.
#[derive(Debug, Clone)]
pub enum Signer<'a> {
    /// A plain ed25519 key.
    Single(&'a Ed25519Keypair),
    /// A multisig key and the constituents (by key index) that sign.
    Multi {
        /// The multisig public key.
        key: &'a MultisigPublicKey,
        /// `(key index, keypair)` for each constituent that signs.
        signers: Vec<(usize, &'a Ed25519Keypair)>,
    },
}

impl Signer<'_> {
    /// The public key signatures are checked against.
    pub fn public_key(&self) -> PublicKey {
        match self {
            Signer::Single(kp) => PublicKey::Ed25519(kp.public_key()),
            Signer::Multi { key, .. } => PublicKey::Multisig((*key).clone()),
        }
    }

    /// The signer's address.
    pub fn address(&self) -> Address {
        self.public_key().address()
    }

    fn sorted_signers(&self) -> Vec<(usize, &Ed25519Keypair)> {
        match self {
            Signer::Single(_) => Vec::new(),
            Signer::Multi { signers, .. } => {
                let mut s: Vec<_> = signers.iter().map(|(i, kp)| (*i, *kp)).collect();
                s.sort_by_key(|(i, _)| *i);
                s.dedup_by_key(|(i, _)| *i);
                s
            }
        }
    }

    fn mode_info(&self) -> ModeInfoData {
        match self {
            Signer::Single(_) => ModeInfoData::Single,
            Signer::Multi { key, .. } => {
                let mut bitarray = CompactBitArray::new(key.keys().len());
                let signers = self.sorted_signers();
                for (index, _) in &signers {
                    bitarray.set(*index, true);
                }
                ModeInfoData::Multi {
                    bitarray,
                    mode_infos: vec![ModeInfoData::Single; signers.len()],
                }
            }
        }
    }

    fn sign(&self, doc: &[u8]) -> SignatureData {
        match self {
            Signer::Single(kp) => SignatureData::Single(kp.sign(doc)),
            Signer::Multi { key, .. } => {
                let mut bitarray = CompactBitArray::new(key.keys().len());
                let mut signatures = Vec::new();
                for (index, kp) in self.sorted_signers() {
                    bitarray.set(index, true);
                    signatures.push(SignatureData::Single(kp.sign(doc)));
                }
                SignatureData::Multi {
                    bitarray,
                    signatures,
                }
            }
        }
    }
}

/// One signer of a transaction being built.
#[derive(Debug, Clone)]
pub struct SignerEntry<'a> {
    /// The signing key.
    pub signer: Signer<'a>,
    /// The signer's account number, committed to by the sign doc.
    pub account_number: u64,
    /// The signer's current sequence.
    pub sequence: u64,
    /// Whether the signer info carries the public key.
    pub include_public_key: bool,
}

impl<'a> SignerEntry<'a> {
    /// A signer that includes its public key.
    pub fn new(signer: Signer<'a>, account_number: u64, sequence: u64) -> Self {
        Self {
            signer,
            account_number,
            sequence,
            include_public_key: true,
        }
    }
}

/// Builds `TxRaw` envelopes.
#[derive(Debug, Clone, Default)]
pub struct TxBuilder {
    messages: Vec<Any>,
    memo: String,
    timeout_height: u64,
    fee: proto::Fee,
}

impl TxBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message.
    pub fn message(mut self, msg: &impl SdkMsg) -> Self {
        self.messages.push(msg.to_any());
        self
    }

    /// Appends a raw payload, resolvable or not.
    pub fn any(mut self, any: Any) -> Self {
        self.messages.push(any);
        self
    }

    /// Sets the memo.
    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Sets the timeout height.
    pub fn timeout_height(mut self, height: u64) -> Self {
        self.timeout_height = height;
        self
    }

    /// Sets the fee amount and gas limit.
    pub fn fee(mut self, amount: &Coins, gas_limit: u64) -> Self {
        self.fee.amount = coins_to_proto(amount);
        self.fee.gas_limit = gas_limit;
        self
    }

    /// Sets an explicit fee payer.
    pub fn fee_payer(mut self, payer: &Address) -> Self {
        self.fee.payer = payer.to_string();
        self
    }

    /// Sets a fee granter.
    pub fn fee_granter(mut self, granter: &Address) -> Self {
        self.fee.granter = granter.to_string();
        self
    }

    /// The encoded body.
    pub fn body_bytes(&self) -> Vec<u8> {
        proto::TxBody {
            messages: self.messages.clone(),
            memo: self.memo.clone(),
            timeout_height: self.timeout_height,
            extension_options: Vec::new(),
            non_critical_extension_options: Vec::new(),
        }
        .encode_to_vec()
    }

    /// The encoded auth info for `signers`.
    pub fn auth_info_bytes(&self, signers: &[SignerEntry<'_>]) -> Vec<u8> {
        proto::AuthInfo {
            signer_infos: signers
                .iter()
                .map(|s| proto::SignerInfo {
                    public_key: s
                        .include_public_key
                        .then(|| public_key_to_any(&s.signer.public_key())),
                    mode_info: Some(mode_info_to_proto(&s.signer.mode_info())),
                    sequence: s.sequence,
                })
                .collect(),
            fee: Some(self.fee.clone()),
        }
        .encode_to_vec()
    }

    /// Builds and signs the envelope under `SIGN_MODE_DIRECT`.
    pub fn sign(&self, chain_id: &str, signers: &[SignerEntry<'_>]) -> proto::TxRaw {
        let body_bytes = self.body_bytes();
        let auth_info_bytes = self.auth_info_bytes(signers);
        let signatures = signers
            .iter()
            .map(|s| {
                let doc = proto::SignDoc {
                    body_bytes: body_bytes.clone(),
                    auth_info_bytes: auth_info_bytes.clone(),
                    chain_id: chain_id.to_string(),
                    account_number: s.account_number,
                }
                .encode_to_vec();
                signature_to_raw(&s.signer.sign(&doc))
            })
            .collect();
        proto::TxRaw {
            body_bytes,
            auth_info_bytes,
            signatures,
        }
    }

    /// Builds the envelope with empty placeholder signatures, for simulation.
    pub fn unsigned(&self, signers: &[SignerEntry<'_>]) -> proto::TxRaw {
        proto::TxRaw {
            body_bytes: self.body_bytes(),
            auth_info_bytes: self.auth_info_bytes(signers),
            signatures: vec![Vec::new(); signers.len()],
        }
    }
}

/// Encodes an envelope to wire bytes.
pub fn encode(raw: &proto::TxRaw) -> Vec<u8> {
    raw.encode_to_vec()
}
