// Path: crates/tx/src/msg/bank.rs
//! Token transfer messages.

use super::{decode_strict, pack, parse_address, Msg, ResolveCtx, SdkMsg};
use crate::proto::{self, coins_from_proto, Any};
use crate::unknown_fields;
use ante_types::app::{Address, Coins};
use ante_types::error::TxError;

/// Type identifier of [`MsgSend`].
pub const MSG_SEND_TYPE_URL: &str = "/ante.bank.v1.MsgSend";
/// Type identifier of [`MsgMultiSend`].
pub const MSG_MULTI_SEND_TYPE_URL: &str = "/ante.bank.v1.MsgMultiSend";

/// Moves coins from one account to another.
pub type MsgSend = proto::MsgSend;
/// Moves coins from one input to many outputs.
pub type MsgMultiSend = proto::MsgMultiSend;

pub(crate) fn decode_send(bytes: &[u8], _ctx: &ResolveCtx<'_>) -> Result<Msg, TxError> {
    decode_strict(bytes, unknown_fields::MSG_SEND).map(Msg::Send)
}

pub(crate) fn decode_multi_send(bytes: &[u8], _ctx: &ResolveCtx<'_>) -> Result<Msg, TxError> {
    decode_strict(bytes, unknown_fields::MSG_MULTI_SEND).map(Msg::MultiSend)
}

impl MsgSend {
    /// Builds a transfer message.
    pub fn new(from: &Address, to: &Address, amount: &Coins) -> Self {
        Self {
            from_address: from.to_string(),
            to_address: to.to_string(),
            amount: proto::coins_to_proto(amount),
        }
    }

    /// The parsed (sender, recipient, amount).
    pub fn parts(&self) -> Result<(Address, Address, Coins), TxError> {
        Ok((
            parse_address("from_address", &self.from_address)?,
            parse_address("to_address", &self.to_address)?,
            coins_from_proto(&self.amount)?,
        ))
    }
}

impl SdkMsg for MsgSend {
    fn type_url(&self) -> &'static str {
        MSG_SEND_TYPE_URL
    }

    fn validate_basic(&self) -> Result<(), TxError> {
        let (_, _, amount) = self.parts()?;
        if amount.is_zero() {
            return Err(TxError::InvalidCoins("send amount must be positive".into()));
        }
        Ok(())
    }

    fn signers(&self) -> Result<Vec<Address>, TxError> {
        Ok(vec![parse_address("from_address", &self.from_address)?])
    }

    fn to_any(&self) -> Any {
        pack(MSG_SEND_TYPE_URL, self)
    }
}

impl MsgMultiSend {
    /// The parsed inputs and outputs.
    pub fn parts(&self) -> Result<(Vec<(Address, Coins)>, Vec<(Address, Coins)>), TxError> {
        let inputs = self
            .inputs
            .iter()
            .map(|i| Ok((parse_address("input", &i.address)?, coins_from_proto(&i.coins)?)))
            .collect::<Result<Vec<_>, TxError>>()?;
        let outputs = self
            .outputs
            .iter()
            .map(|o| Ok((parse_address("output", &o.address)?, coins_from_proto(&o.coins)?)))
            .collect::<Result<Vec<_>, TxError>>()?;
        Ok((inputs, outputs))
    }
}

impl SdkMsg for MsgMultiSend {
    fn type_url(&self) -> &'static str {
        MSG_MULTI_SEND_TYPE_URL
    }

    fn validate_basic(&self) -> Result<(), TxError> {
        if self.inputs.len() != 1 {
            return Err(TxError::Validation("multi send requires exactly one input".into()));
        }
        if self.outputs.is_empty() {
            return Err(TxError::Validation("multi send requires outputs".into()));
        }
        let (inputs, outputs) = self.parts()?;
        let sum = |side: &[(Address, Coins)]| -> Result<Coins, TxError> {
            side.iter().try_fold(Coins::empty(), |acc, (_, c)| {
                if c.is_zero() {
                    return Err(TxError::InvalidCoins("empty coins in multi send".into()));
                }
                acc.checked_add(c)
            })
        };
        if sum(&inputs)? != sum(&outputs)? {
            return Err(TxError::Validation("sum inputs != sum outputs".into()));
        }
        Ok(())
    }

    fn signers(&self) -> Result<Vec<Address>, TxError> {
        self.inputs
            .iter()
            .map(|i| parse_address("input", &i.address))
            .collect()
    }

    fn to_any(&self) -> Any {
        pack(MSG_MULTI_SEND_TYPE_URL, self)
    }
}
