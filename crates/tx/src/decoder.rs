// Path: crates/tx/src/decoder.rs
//! Raw bytes to [`DecodedTx`].

use crate::msg::{MessageContainer, MsgRegistry, ResolveCtx};
use crate::proto::{self, coins_from_proto};
use crate::pubkey::mode_info_from_proto;
use crate::tx::{DecodedTx, Fee, SignerInfoData};
use crate::unknown_fields;
use ante_types::app::{tx_hash, Address};
use ante_types::config::DecodeLimits;
use ante_types::error::TxError;
use prost::Message;
use std::cell::Cell;
use tracing::{debug, warn};

/// Gas limits above this are rejected outright.
pub const MAX_GAS_WANTED: u64 = u64::MAX / 2;

/// Decodes untrusted wire bytes.
///
/// Decoding runs in three steps: the envelope, then the body, then the auth
/// info. Every hard bound (total size, message count, per-message size,
/// nesting, signer and signature counts) is enforced before any message
/// payload is resolved.
#[derive(Debug, Clone)]
pub struct TxDecoder {
    registry: MsgRegistry,
    limits: DecodeLimits,
}

fn limit(what: &str, got: usize, max: usize) -> Result<(), TxError> {
    if got > max {
        return Err(TxError::LimitExceeded(format!("{what}: {got} exceeds {max}")));
    }
    Ok(())
}

fn optional_address(field: &str, value: &str) -> Result<Option<Address>, TxError> {
    if value.is_empty() {
        return Ok(None);
    }
    Address::parse(value)
        .map(Some)
        .map_err(|e| TxError::Decode(format!("fee {field}: {e}")))
}

impl TxDecoder {
    /// Creates a decoder over `registry` with `limits`.
    pub fn new(registry: MsgRegistry, limits: DecodeLimits) -> Self {
        Self { registry, limits }
    }

    /// The message registry.
    pub fn registry(&self) -> &MsgRegistry {
        &self.registry
    }

    /// The bounds in force.
    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    /// Decodes `raw` into a transaction with every message resolved.
    pub fn decode(&self, raw: &[u8]) -> Result<DecodedTx, TxError> {
        let limits = &self.limits;
        limit("tx bytes", raw.len(), limits.max_tx_bytes)?;

        // 1. Envelope: nothing unknown is tolerated.
        unknown_fields::check(raw, unknown_fields::TX_RAW, false)?;
        let envelope = proto::TxRaw::decode(raw).map_err(|e| TxError::Decode(e.to_string()))?;
        limit("signatures", envelope.signatures.len(), limits.max_signatures)?;

        // 2. Body: non-critical unknown fields are skipped.
        let skipped = unknown_fields::check(&envelope.body_bytes, unknown_fields::TX_BODY, true)?;
        for field in skipped {
            warn!(target: "decode", field, "skipping unknown non-critical body field");
        }
        let body = proto::TxBody::decode(envelope.body_bytes.as_slice())
            .map_err(|e| TxError::Decode(e.to_string()))?;
        if !body.extension_options.is_empty() {
            return Err(TxError::Decode("unknown extension options".into()));
        }
        if !body.non_critical_extension_options.is_empty() {
            warn!(
                target: "decode",
                count = body.non_critical_extension_options.len(),
                "ignoring non-critical extension options"
            );
        }
        limit("messages", body.messages.len(), limits.max_msgs)?;
        for any in &body.messages {
            limit("message bytes", any.value.len(), limits.max_msg_bytes)?;
        }

        // 3. Auth info: strict.
        unknown_fields::check(&envelope.auth_info_bytes, &unknown_fields::AUTH_INFO, false)?;
        let auth = proto::AuthInfo::decode(envelope.auth_info_bytes.as_slice())
            .map_err(|e| TxError::Decode(e.to_string()))?;
        limit("signer infos", auth.signer_infos.len(), limits.max_signatures)?;

        let fee = auth
            .fee
            .ok_or_else(|| TxError::Decode("missing fee".into()))?;
        let fee = Fee {
            amount: coins_from_proto(&fee.amount).map_err(|e| TxError::Decode(e.to_string()))?,
            gas_limit: fee.gas_limit,
            payer: optional_address("payer", &fee.payer)?,
            granter: optional_address("granter", &fee.granter)?,
        };

        let signer_infos = auth
            .signer_infos
            .into_iter()
            .map(|info| {
                let mode = info
                    .mode_info
                    .as_ref()
                    .ok_or_else(|| TxError::Decode("signer info without mode info".into()))?;
                Ok(SignerInfoData {
                    public_key: info.public_key,
                    mode_info: mode_info_from_proto(mode, limits.max_nesting_depth)?,
                    sequence: info.sequence,
                })
            })
            .collect::<Result<Vec<_>, TxError>>()?;

        // Bounds hold; resolve payloads.
        let counter = Cell::new(0);
        let ctx = ResolveCtx::new(&self.registry, limits, &counter);
        let messages = body
            .messages
            .into_iter()
            .map(|any| {
                let msg = self.registry.resolve(&any, &ctx)?;
                Ok(MessageContainer::from_resolved(any, msg))
            })
            .collect::<Result<Vec<_>, TxError>>()?;

        let hash = tx_hash(raw);
        debug!(
            target: "decode",
            tx = %hex::encode(hash),
            msgs = messages.len(),
            signers = signer_infos.len(),
            "decoded transaction"
        );
        Ok(DecodedTx {
            raw_len: raw.len(),
            hash,
            body_bytes: envelope.body_bytes,
            auth_info_bytes: envelope.auth_info_bytes,
            messages,
            memo: body.memo,
            timeout_height: body.timeout_height,
            signer_infos,
            fee,
            signatures: envelope.signatures,
        })
    }
}
