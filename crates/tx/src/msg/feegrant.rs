// Path: crates/tx/src/msg/feegrant.rs
//! Fee allowances: one account paying fees on behalf of another.

use super::{decode_strict, pack, parse_address, Msg, ResolveCtx, SdkMsg};
use crate::proto::{self, coins_from_proto, coins_to_proto, Any};
use crate::unknown_fields;
use ante_types::app::{Address, Coins};
use ante_types::error::TxError;
use parity_scale_codec::{Decode, Encode};

/// Type identifier of [`MsgGrantAllowance`].
pub const MSG_GRANT_ALLOWANCE_TYPE_URL: &str = "/ante.feegrant.v1.MsgGrantAllowance";
/// Type identifier of [`MsgRevokeAllowance`].
pub const MSG_REVOKE_ALLOWANCE_TYPE_URL: &str = "/ante.feegrant.v1.MsgRevokeAllowance";
/// Type identifier of [`BasicAllowance`].
pub const BASIC_ALLOWANCE_TYPE_URL: &str = "/ante.feegrant.v1.BasicAllowance";
/// Type identifier of [`AllowedMsgAllowance`].
pub const ALLOWED_MSG_ALLOWANCE_TYPE_URL: &str = "/ante.feegrant.v1.AllowedMsgAllowance";

/// A spend limit with an optional expiry.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct BasicAllowance {
    /// Remaining spendable fees. Empty means unlimited.
    pub spend_limit: Coins,
    /// Last height at which the allowance is usable. Zero means no expiry.
    pub expiration_height: u64,
}

/// Restricts an inner allowance to a list of message types.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct AllowedMsgAllowance {
    /// The allowance that pays once the message filter passes.
    pub allowance: BasicAllowance,
    /// Message type identifiers the allowance may pay for.
    pub allowed_messages: Vec<String>,
}

/// A stored fee allowance.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum FeeAllowance {
    /// See [`BasicAllowance`].
    #[codec(index = 0)]
    Basic(BasicAllowance),
    /// See [`AllowedMsgAllowance`].
    #[codec(index = 1)]
    AllowedMsg(AllowedMsgAllowance),
}

impl BasicAllowance {
    fn validate(&self) -> Result<(), TxError> {
        self.spend_limit.validate()
    }

    /// Deducts `fee`, returning true once the allowance is used up.
    fn accept(&mut self, fee: &Coins, height: u64) -> Result<bool, TxError> {
        if self.expiration_height != 0 && height > self.expiration_height {
            return Err(TxError::FeeAllowance("fee allowance expired".into()));
        }
        if self.spend_limit.is_zero() {
            return Ok(false);
        }
        let left = self.spend_limit.checked_sub(fee).map_err(|_| {
            TxError::FeeAllowance(format!(
                "basic allowance: fee {fee} exceeds spend limit {}",
                self.spend_limit
            ))
        })?;
        self.spend_limit = left;
        Ok(self.spend_limit.is_zero())
    }

    fn to_any(&self) -> Any {
        pack(
            BASIC_ALLOWANCE_TYPE_URL,
            &proto::BasicAllowance {
                spend_limit: coins_to_proto(&self.spend_limit),
                expiration_height: self.expiration_height,
            },
        )
    }
}

impl FeeAllowance {
    /// Checks internal consistency.
    pub fn validate(&self) -> Result<(), TxError> {
        match self {
            FeeAllowance::Basic(basic) => basic.validate(),
            FeeAllowance::AllowedMsg(allowed) => {
                if allowed.allowed_messages.is_empty() {
                    return Err(TxError::Validation("allowed messages shouldn't be empty".into()));
                }
                allowed.allowance.validate()
            }
        }
    }

    /// Charges `fee` for a transaction carrying `msgs` at `height`.
    ///
    /// Every message is checked, including messages nested inside wrapper
    /// messages at any depth. Returns true if the allowance is exhausted and
    /// should be deleted.
    pub fn accept(&mut self, fee: &Coins, msgs: &[&Msg], height: u64) -> Result<bool, TxError> {
        match self {
            FeeAllowance::Basic(basic) => basic.accept(fee, height),
            FeeAllowance::AllowedMsg(allowed) => {
                let mut urls = Vec::new();
                for msg in msgs {
                    msg.collect_type_urls(&mut urls);
                }
                if let Some(denied) = urls
                    .iter()
                    .find(|url| !allowed.allowed_messages.iter().any(|a| a == *url))
                {
                    return Err(TxError::FeeAllowance(format!(
                        "message {denied} does not exist in allowed messages"
                    )));
                }
                allowed.allowance.accept(fee, height)
            }
        }
    }

    /// Encodes the allowance for the wire.
    pub fn to_any(&self) -> Any {
        match self {
            FeeAllowance::Basic(basic) => basic.to_any(),
            FeeAllowance::AllowedMsg(allowed) => pack(
                ALLOWED_MSG_ALLOWANCE_TYPE_URL,
                &proto::AllowedMsgAllowance {
                    allowance: Some(allowed.allowance.to_any()),
                    allowed_messages: allowed.allowed_messages.clone(),
                },
            ),
        }
    }

    /// Decodes an allowance from the wire. The inner allowance of an
    /// `AllowedMsgAllowance` must be basic.
    pub fn from_any(any: &Any) -> Result<Self, TxError> {
        match any.type_url.as_str() {
            BASIC_ALLOWANCE_TYPE_URL => basic_from_any(any).map(FeeAllowance::Basic),
            ALLOWED_MSG_ALLOWANCE_TYPE_URL => {
                let raw: proto::AllowedMsgAllowance =
                    decode_strict(&any.value, unknown_fields::ALLOWED_MSG_ALLOWANCE)?;
                let inner = raw
                    .allowance
                    .ok_or_else(|| TxError::Decode("missing inner allowance".into()))?;
                if inner.type_url != BASIC_ALLOWANCE_TYPE_URL {
                    return Err(TxError::Decode(format!(
                        "unsupported inner allowance {}",
                        inner.type_url
                    )));
                }
                Ok(FeeAllowance::AllowedMsg(AllowedMsgAllowance {
                    allowance: basic_from_any(&inner)?,
                    allowed_messages: raw.allowed_messages,
                }))
            }
            other => Err(TxError::Decode(format!("unsupported allowance type {other}"))),
        }
    }
}

fn basic_from_any(any: &Any) -> Result<BasicAllowance, TxError> {
    let raw: proto::BasicAllowance = decode_strict(&any.value, unknown_fields::BASIC_ALLOWANCE)?;
    Ok(BasicAllowance {
        spend_limit: coins_from_proto(&raw.spend_limit)?,
        expiration_height: raw.expiration_height,
    })
}

/// Stores a fee allowance from granter to grantee.
#[derive(Debug, Clone, PartialEq)]
pub struct MsgGrantAllowance {
    /// The paying account.
    pub granter: String,
    /// The account whose fees are paid.
    pub grantee: String,
    /// The allowance.
    pub allowance: FeeAllowance,
}

/// Deletes a fee allowance.
pub type MsgRevokeAllowance = proto::MsgRevokeAllowance;

pub(crate) fn decode_grant_allowance(bytes: &[u8], _ctx: &ResolveCtx<'_>) -> Result<Msg, TxError> {
    let raw: proto::MsgGrantAllowance = decode_strict(bytes, unknown_fields::MSG_GRANT_ALLOWANCE)?;
    let any = raw
        .allowance
        .ok_or_else(|| TxError::Decode("missing allowance".into()))?;
    Ok(Msg::GrantAllowance(MsgGrantAllowance {
        granter: raw.granter,
        grantee: raw.grantee,
        allowance: FeeAllowance::from_any(&any)?,
    }))
}

pub(crate) fn decode_revoke_allowance(bytes: &[u8], _ctx: &ResolveCtx<'_>) -> Result<Msg, TxError> {
    decode_strict(bytes, unknown_fields::MSG_REVOKE_ALLOWANCE).map(Msg::RevokeAllowance)
}

fn distinct_parties(granter: &str, grantee: &str) -> Result<(Address, Address), TxError> {
    let granter = parse_address("granter", granter)?;
    let grantee = parse_address("grantee", grantee)?;
    if granter == grantee {
        return Err(TxError::Validation("cannot self-grant a fee allowance".into()));
    }
    Ok((granter, grantee))
}

impl MsgGrantAllowance {
    /// The parsed granter and grantee.
    pub fn parties(&self) -> Result<(Address, Address), TxError> {
        distinct_parties(&self.granter, &self.grantee)
    }
}

impl SdkMsg for MsgGrantAllowance {
    fn type_url(&self) -> &'static str {
        MSG_GRANT_ALLOWANCE_TYPE_URL
    }

    fn validate_basic(&self) -> Result<(), TxError> {
        self.parties()?;
        self.allowance.validate()
    }

    fn signers(&self) -> Result<Vec<Address>, TxError> {
        Ok(vec![parse_address("granter", &self.granter)?])
    }

    fn to_any(&self) -> Any {
        pack(
            MSG_GRANT_ALLOWANCE_TYPE_URL,
            &proto::MsgGrantAllowance {
                granter: self.granter.clone(),
                grantee: self.grantee.clone(),
                allowance: Some(self.allowance.to_any()),
            },
        )
    }
}

impl MsgRevokeAllowance {
    /// The parsed granter and grantee.
    pub fn parties(&self) -> Result<(Address, Address), TxError> {
        distinct_parties(&self.granter, &self.grantee)
    }
}

impl SdkMsg for MsgRevokeAllowance {
    fn type_url(&self) -> &'static str {
        MSG_REVOKE_ALLOWANCE_TYPE_URL
    }

    fn validate_basic(&self) -> Result<(), TxError> {
        self.parties().map(|_| ())
    }

    fn signers(&self) -> Result<Vec<Address>, TxError> {
        Ok(vec![parse_address("granter", &self.granter)?])
    }

    fn to_any(&self) -> Any {
        pack(MSG_REVOKE_ALLOWANCE_TYPE_URL, self)
    }
}
