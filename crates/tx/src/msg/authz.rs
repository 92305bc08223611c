// Path: crates/tx/src/msg/authz.rs
//! Delegated execution: grants and the `MsgExec` wrapper.

use super::{decode_strict, pack, parse_address, MessageContainer, Msg, ResolveCtx, SdkMsg};
use crate::proto::{self, Any};
use crate::unknown_fields;
use ante_types::app::Address;
use ante_types::error::TxError;
use parity_scale_codec::{Decode, Encode};

/// Type identifier of [`MsgExec`].
pub const MSG_EXEC_TYPE_URL: &str = "/ante.authz.v1.MsgExec";
/// Type identifier of [`MsgGrant`].
pub const MSG_GRANT_TYPE_URL: &str = "/ante.authz.v1.MsgGrant";
/// Type identifier of [`MsgRevoke`].
pub const MSG_REVOKE_TYPE_URL: &str = "/ante.authz.v1.MsgRevoke";
/// Type identifier of a generic authorization.
pub const GENERIC_AUTHORIZATION_TYPE_URL: &str = "/ante.authz.v1.GenericAuthorization";

/// What a grant permits.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum Authorization {
    /// Unrestricted execution of one message type.
    Generic {
        /// The permitted message type identifier.
        msg: String,
    },
}

impl Authorization {
    /// The message type identifier this authorization covers.
    pub fn msg_type_url(&self) -> &str {
        match self {
            Authorization::Generic { msg } => msg,
        }
    }

    fn to_any(&self) -> Any {
        match self {
            Authorization::Generic { msg } => pack(
                GENERIC_AUTHORIZATION_TYPE_URL,
                &proto::GenericAuthorization { msg: msg.clone() },
            ),
        }
    }
}

/// A stored grant from a granter to a grantee.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Grant {
    /// What is permitted.
    pub authorization: Authorization,
    /// Last height at which the grant is usable. Zero means no expiry.
    pub expiration_height: u64,
}

impl Grant {
    /// Returns true if the grant has expired at `height`.
    pub fn is_expired(&self, height: u64) -> bool {
        self.expiration_height != 0 && height > self.expiration_height
    }
}

/// Executes nested messages with the grantee standing in for their signers.
#[derive(Debug, Clone, PartialEq)]
pub struct MsgExec {
    /// The account executing the messages.
    pub grantee: String,
    /// The nested messages, already resolved.
    pub msgs: Vec<MessageContainer>,
}

/// Stores an authz grant.
#[derive(Debug, Clone, PartialEq)]
pub struct MsgGrant {
    /// The account granting permission.
    pub granter: String,
    /// The account receiving permission.
    pub grantee: String,
    /// The grant itself.
    pub grant: Grant,
}

/// Deletes an authz grant.
pub type MsgRevoke = proto::MsgRevoke;

pub(crate) fn decode_exec(bytes: &[u8], ctx: &ResolveCtx<'_>) -> Result<Msg, TxError> {
    let raw: proto::MsgExec = decode_strict(bytes, unknown_fields::MSG_EXEC)?;
    let msgs = raw
        .msgs
        .into_iter()
        .map(|any| ctx.resolve_nested(any))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Msg::Exec(MsgExec {
        grantee: raw.grantee,
        msgs,
    }))
}

pub(crate) fn decode_grant(bytes: &[u8], _ctx: &ResolveCtx<'_>) -> Result<Msg, TxError> {
    let raw: proto::MsgGrant = decode_strict(bytes, unknown_fields::MSG_GRANT)?;
    let grant = raw
        .grant
        .ok_or_else(|| TxError::Decode("missing grant".into()))?;
    let any = grant
        .authorization
        .ok_or_else(|| TxError::Decode("missing authorization".into()))?;
    if any.type_url != GENERIC_AUTHORIZATION_TYPE_URL {
        return Err(TxError::UnresolvedMessage {
            type_url: any.type_url,
            reason: "unsupported authorization type".into(),
        });
    }
    let generic: proto::GenericAuthorization =
        decode_strict(&any.value, unknown_fields::GENERIC_AUTHORIZATION)?;
    Ok(Msg::Grant(MsgGrant {
        granter: raw.granter,
        grantee: raw.grantee,
        grant: Grant {
            authorization: Authorization::Generic { msg: generic.msg },
            expiration_height: grant.expiration_height,
        },
    }))
}

pub(crate) fn decode_revoke(bytes: &[u8], _ctx: &ResolveCtx<'_>) -> Result<Msg, TxError> {
    decode_strict(bytes, unknown_fields::MSG_REVOKE).map(Msg::Revoke)
}

impl MsgExec {
    /// Wraps already-resolved messages.
    pub fn new(grantee: &Address, msgs: Vec<Msg>) -> Self {
        Self {
            grantee: grantee.to_string(),
            msgs: msgs
                .into_iter()
                .map(|m| MessageContainer::from_resolved(m.to_any(), m))
                .collect(),
        }
    }

    /// The resolved nested messages.
    pub fn nested(&self) -> Result<Vec<&Msg>, TxError> {
        self.msgs.iter().map(MessageContainer::msg).collect()
    }
}

impl SdkMsg for MsgExec {
    fn type_url(&self) -> &'static str {
        MSG_EXEC_TYPE_URL
    }

    fn validate_basic(&self) -> Result<(), TxError> {
        parse_address("grantee", &self.grantee)?;
        if self.msgs.is_empty() {
            return Err(TxError::Validation("exec requires at least one message".into()));
        }
        for msg in self.nested()? {
            msg.validate_basic()?;
        }
        Ok(())
    }

    fn signers(&self) -> Result<Vec<Address>, TxError> {
        Ok(vec![parse_address("grantee", &self.grantee)?])
    }

    fn to_any(&self) -> Any {
        pack(
            MSG_EXEC_TYPE_URL,
            &proto::MsgExec {
                grantee: self.grantee.clone(),
                msgs: self.msgs.iter().map(MessageContainer::to_any).collect(),
            },
        )
    }
}

fn distinct_parties(granter: &str, grantee: &str) -> Result<(Address, Address), TxError> {
    let granter = parse_address("granter", granter)?;
    let grantee = parse_address("grantee", grantee)?;
    if granter == grantee {
        return Err(TxError::Validation("granter and grantee cannot be the same".into()));
    }
    Ok((granter, grantee))
}

impl MsgGrant {
    /// The parsed granter and grantee.
    pub fn parties(&self) -> Result<(Address, Address), TxError> {
        distinct_parties(&self.granter, &self.grantee)
    }
}

impl SdkMsg for MsgGrant {
    fn type_url(&self) -> &'static str {
        MSG_GRANT_TYPE_URL
    }

    fn validate_basic(&self) -> Result<(), TxError> {
        self.parties()?;
        if self.grant.authorization.msg_type_url().is_empty() {
            return Err(TxError::Validation("authorization message type is empty".into()));
        }
        Ok(())
    }

    fn signers(&self) -> Result<Vec<Address>, TxError> {
        Ok(vec![parse_address("granter", &self.granter)?])
    }

    fn to_any(&self) -> Any {
        pack(
            MSG_GRANT_TYPE_URL,
            &proto::MsgGrant {
                granter: self.granter.clone(),
                grantee: self.grantee.clone(),
                grant: Some(proto::Grant {
                    authorization: Some(self.grant.authorization.to_any()),
                    expiration_height: self.grant.expiration_height,
                }),
            },
        )
    }
}

impl MsgRevoke {
    /// The parsed granter and grantee.
    pub fn parties(&self) -> Result<(Address, Address), TxError> {
        distinct_parties(&self.granter, &self.grantee)
    }
}

impl SdkMsg for MsgRevoke {
    fn type_url(&self) -> &'static str {
        MSG_REVOKE_TYPE_URL
    }

    fn validate_basic(&self) -> Result<(), TxError> {
        self.parties()?;
        if self.msg_type_url.is_empty() {
            return Err(TxError::Validation("missing message type to revoke".into()));
        }
        Ok(())
    }

    fn signers(&self) -> Result<Vec<Address>, TxError> {
        Ok(vec![parse_address("granter", &self.granter)?])
    }

    fn to_any(&self) -> Any {
        pack(MSG_REVOKE_TYPE_URL, self)
    }
}
