// Path: crates/tx/src/msg/registry.rs

use super::{authz, bank, feegrant, MessageContainer, Msg};
use crate::proto::Any;
use crate::unknown_fields::{self, Field};
use ante_types::config::DecodeLimits;
use ante_types::error::TxError;
use std::cell::Cell;
use std::collections::BTreeMap;

/// Decodes a payload registered under one type identifier.
pub type DecodeFn = fn(&[u8], &ResolveCtx<'_>) -> Result<Msg, TxError>;

/// Explicit mapping from type identifier to decoder.
///
/// Built once at start-up. A type identifier that is not registered never
/// resolves.
#[derive(Clone)]
pub struct MsgRegistry {
    decoders: BTreeMap<&'static str, DecodeFn>,
}

impl std::fmt::Debug for MsgRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.decoders.keys()).finish()
    }
}

impl Default for MsgRegistry {
    fn default() -> Self {
        Self::with_default_messages()
    }
}

impl MsgRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            decoders: BTreeMap::new(),
        }
    }

    /// A registry holding every message type this crate defines.
    pub fn with_default_messages() -> Self {
        let mut r = Self::empty();
        r.register(bank::MSG_SEND_TYPE_URL, bank::decode_send);
        r.register(bank::MSG_MULTI_SEND_TYPE_URL, bank::decode_multi_send);
        r.register(authz::MSG_EXEC_TYPE_URL, authz::decode_exec);
        r.register(authz::MSG_GRANT_TYPE_URL, authz::decode_grant);
        r.register(authz::MSG_REVOKE_TYPE_URL, authz::decode_revoke);
        r.register(feegrant::MSG_GRANT_ALLOWANCE_TYPE_URL, feegrant::decode_grant_allowance);
        r.register(feegrant::MSG_REVOKE_ALLOWANCE_TYPE_URL, feegrant::decode_revoke_allowance);
        r
    }

    /// Registers a decoder. Returns false, keeping the existing entry, if the
    /// identifier is already taken or empty.
    pub fn register(&mut self, type_url: &'static str, decode: DecodeFn) -> bool {
        if type_url.is_empty() || self.decoders.contains_key(type_url) {
            return false;
        }
        self.decoders.insert(type_url, decode);
        true
    }

    /// Returns true if `type_url` has a decoder.
    pub fn contains(&self, type_url: &str) -> bool {
        self.decoders.contains_key(type_url)
    }

    /// Resolves one payload. Empty and unknown identifiers, and payloads
    /// that fail to decode, are reported as `UnresolvedMessage`; an oversized
    /// payload or exhausted nesting budget as `LimitExceeded`.
    pub fn resolve(&self, any: &Any, ctx: &ResolveCtx<'_>) -> Result<Msg, TxError> {
        let unresolved = |reason: String| TxError::UnresolvedMessage {
            type_url: any.type_url.clone(),
            reason,
        };
        if any.type_url.is_empty() {
            return Err(unresolved("empty type identifier".into()));
        }
        let decode = self
            .decoders
            .get(any.type_url.as_str())
            .ok_or_else(|| unresolved("no decoder registered for type".into()))?;
        if any.value.len() > ctx.limits.max_msg_bytes {
            return Err(TxError::LimitExceeded(format!(
                "message payload of {} bytes exceeds {}",
                any.value.len(),
                ctx.limits.max_msg_bytes
            )));
        }
        ctx.charge_message()?;
        decode(&any.value, ctx).map_err(|e| match e {
            TxError::UnresolvedMessage { .. } | TxError::LimitExceeded(_) => e,
            other => unresolved(other.to_string()),
        })
    }
}

/// State threaded through one resolution pass: the registry for nested
/// payloads, the decoder bounds, the current wrapper depth and a counter of
/// messages resolved so far, shared by every level.
pub struct ResolveCtx<'a> {
    registry: &'a MsgRegistry,
    limits: &'a DecodeLimits,
    depth: usize,
    resolved: &'a Cell<usize>,
}

impl<'a> ResolveCtx<'a> {
    /// A top-level context counting resolved messages into `counter`.
    pub fn new(registry: &'a MsgRegistry, limits: &'a DecodeLimits, counter: &'a Cell<usize>) -> Self {
        Self {
            registry,
            limits,
            depth: 1,
            resolved: counter,
        }
    }

    /// The decoder bounds in force.
    pub fn limits(&self) -> &DecodeLimits {
        self.limits
    }

    fn charge_message(&self) -> Result<(), TxError> {
        let next = self.resolved.get() + 1;
        if next > self.limits.max_msgs {
            return Err(TxError::LimitExceeded(format!(
                "more than {} messages including nested messages",
                self.limits.max_msgs
            )));
        }
        self.resolved.set(next);
        Ok(())
    }

    /// Resolves a payload nested one level below the current one.
    pub fn resolve_nested(&self, any: Any) -> Result<MessageContainer, TxError> {
        let depth = self.depth + 1;
        if depth > self.limits.max_nesting_depth {
            return Err(TxError::LimitExceeded(format!(
                "message nesting depth {depth} exceeds {}",
                self.limits.max_nesting_depth
            )));
        }
        let child = ResolveCtx {
            registry: self.registry,
            limits: self.limits,
            depth,
            resolved: self.resolved,
        };
        let msg = self.registry.resolve(&any, &child)?;
        Ok(MessageContainer::from_resolved(any, msg))
    }
}

/// Checks `bytes` for unknown fields against `fields`, then decodes.
pub(crate) fn decode_strict<M: prost::Message + Default>(
    bytes: &[u8],
    fields: &[Field],
) -> Result<M, TxError> {
    unknown_fields::check(bytes, fields, false)?;
    M::decode(bytes).map_err(|e| TxError::Decode(e.to_string()))
}
