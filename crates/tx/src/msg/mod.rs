// Path: crates/tx/src/msg/mod.rs
//! Messages, the containers that carry them and the registry that resolves them.

pub mod authz;
pub mod bank;
pub mod feegrant;
mod registry;

pub use registry::{DecodeFn, MsgRegistry, ResolveCtx};
pub(crate) use registry::decode_strict;

use crate::proto::Any;
use ante_types::app::Address;
use ante_types::config::DecodeLimits;
use ante_types::error::TxError;
use std::sync::OnceLock;

pub use authz::{Authorization, Grant, MsgExec, MsgGrant, MsgRevoke};
pub use bank::{MsgMultiSend, MsgSend};
pub use feegrant::{AllowedMsgAllowance, BasicAllowance, FeeAllowance, MsgGrantAllowance, MsgRevokeAllowance};

/// The contract every message type satisfies.
pub trait SdkMsg {
    /// The type identifier this message is registered under.
    fn type_url(&self) -> &'static str;
    /// Stateless checks: address formats, amounts, internal consistency.
    fn validate_basic(&self) -> Result<(), TxError>;
    /// The addresses that must sign a transaction carrying this message.
    fn signers(&self) -> Result<Vec<Address>, TxError>;
    /// Re-encodes the message for the wire.
    fn to_any(&self) -> Any;
}

/// A resolved message.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Single-input transfer.
    Send(MsgSend),
    /// Multi-input, multi-output transfer.
    MultiSend(MsgMultiSend),
    /// Execute nested messages on behalf of their signers.
    Exec(MsgExec),
    /// Store an authz grant.
    Grant(MsgGrant),
    /// Delete an authz grant.
    Revoke(MsgRevoke),
    /// Store a fee allowance.
    GrantAllowance(MsgGrantAllowance),
    /// Delete a fee allowance.
    RevokeAllowance(MsgRevokeAllowance),
}

impl Msg {
    fn inner(&self) -> &dyn SdkMsg {
        match self {
            Msg::Send(m) => m,
            Msg::MultiSend(m) => m,
            Msg::Exec(m) => m,
            Msg::Grant(m) => m,
            Msg::Revoke(m) => m,
            Msg::GrantAllowance(m) => m,
            Msg::RevokeAllowance(m) => m,
        }
    }

    /// Appends the type identifier of this message and, for wrapper
    /// messages, of every nested message, depth first.
    pub fn collect_type_urls<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(self.type_url());
        if let Msg::Exec(exec) = self {
            for container in &exec.msgs {
                match container.msg() {
                    Ok(nested) => nested.collect_type_urls(out),
                    Err(_) => out.push(container.type_url()),
                }
            }
        }
    }
}

impl SdkMsg for Msg {
    fn type_url(&self) -> &'static str {
        self.inner().type_url()
    }
    fn validate_basic(&self) -> Result<(), TxError> {
        self.inner().validate_basic()
    }
    fn signers(&self) -> Result<Vec<Address>, TxError> {
        self.inner().signers()
    }
    fn to_any(&self) -> Any {
        self.inner().to_any()
    }
}

/// Where a container stands in the resolution lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    /// The payload decoded into a message.
    Resolved(&'a Msg),
    /// Resolution failed. The container stays in this state for good.
    Unresolved(&'a str),
    /// A lazy container that nobody has asked for yet.
    Pending,
}

/// A type identifier plus opaque payload, resolved eagerly by the decoder or
/// lazily on first access.
///
/// There is no state in which a container reports success without a
/// message: an empty, unknown or undecodable payload is `Unresolved` and
/// every accessor returns an error.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageContainer {
    type_url: String,
    value: Vec<u8>,
    resolved: OnceLock<Result<Msg, String>>,
}

impl MessageContainer {
    pub(crate) fn from_resolved(any: Any, msg: Msg) -> Self {
        Self {
            type_url: any.type_url,
            value: any.value,
            resolved: OnceLock::from(Ok(msg)),
        }
    }

    /// Wraps a payload without resolving it.
    pub fn lazy(any: Any) -> Self {
        Self {
            type_url: any.type_url,
            value: any.value,
            resolved: OnceLock::new(),
        }
    }

    /// The type identifier as it appeared on the wire.
    pub fn type_url(&self) -> &str {
        &self.type_url
    }

    /// The raw payload.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// The original wire form.
    pub fn to_any(&self) -> Any {
        Any {
            type_url: self.type_url.clone(),
            value: self.value.clone(),
        }
    }

    /// The current resolution state.
    pub fn state(&self) -> Resolution<'_> {
        match self.resolved.get() {
            Some(Ok(msg)) => Resolution::Resolved(msg),
            Some(Err(reason)) => Resolution::Unresolved(reason),
            None => Resolution::Pending,
        }
    }

    /// The resolved message. Fails for unresolved and pending containers.
    pub fn msg(&self) -> Result<&Msg, TxError> {
        match self.state() {
            Resolution::Resolved(msg) => Ok(msg),
            Resolution::Unresolved(reason) => Err(self.unresolved(reason)),
            Resolution::Pending => Err(self.unresolved("message has not been resolved")),
        }
    }

    /// Resolves the payload on first call and caches the outcome, success or
    /// failure, for every later call.
    pub fn resolve(&self, registry: &MsgRegistry, limits: &DecodeLimits) -> Result<&Msg, TxError> {
        let outcome = self.resolved.get_or_init(|| {
            let counter = std::cell::Cell::new(0);
            let ctx = ResolveCtx::new(registry, limits, &counter);
            registry
                .resolve(&self.to_any(), &ctx)
                .map_err(|e| e.to_string())
        });
        match outcome {
            Ok(msg) => Ok(msg),
            Err(reason) => Err(self.unresolved(reason)),
        }
    }

    fn unresolved(&self, reason: &str) -> TxError {
        TxError::UnresolvedMessage {
            type_url: self.type_url.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Parses an address field, naming the field on failure.
pub(crate) fn parse_address(field: &str, value: &str) -> Result<Address, TxError> {
    Address::parse(value).map_err(|e| TxError::InvalidAddress(format!("{field}: {e}")))
}

/// Encodes a prost message into an `Any` under `type_url`.
pub(crate) fn pack<M: prost::Message>(type_url: &str, msg: &M) -> Any {
    Any {
        type_url: type_url.to_string(),
        value: msg.encode_to_vec(),
    }
}
