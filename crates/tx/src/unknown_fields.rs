// Path: crates/tx/src/unknown_fields.rs
//! Detection of protobuf fields the node does not understand.
//!
//! `prost` silently drops unknown fields, which would let two encodings with
//! different bytes carry the same signed meaning. This scanner walks the raw
//! wire format against a static field table before `prost` sees the bytes.
//!
//! A field number with bit 11 set (`number & 1024 != 0`) is non-critical:
//! where permitted it is skipped with a warning. Every other unknown field
//! is critical and rejects the input.

use ante_types::error::TxError;

/// Bit marking a field number as non-critical.
pub const NON_CRITICAL_BIT: u64 = 1 << 10;

/// Maximum depth the scanner descends into nested messages.
const MAX_SCAN_DEPTH: usize = 32;

/// A known field and, for message-typed fields, the table of its payload.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    number: u64,
    nested: Option<&'static [Field]>,
}

const fn scalar(number: u64) -> Field {
    Field {
        number,
        nested: None,
    }
}

const fn message(number: u64, nested: &'static [Field]) -> Field {
    Field {
        number,
        nested: Some(nested),
    }
}

/// `Any`: type_url, value.
pub const ANY: &[Field] = &[scalar(1), scalar(2)];
/// `TxRaw`: body_bytes, auth_info_bytes, signatures.
pub const TX_RAW: &[Field] = &[scalar(1), scalar(2), scalar(3)];
/// `TxBody`. Message payloads are checked when they are resolved.
pub const TX_BODY: &[Field] = &[
    message(1, ANY),
    scalar(2),
    scalar(3),
    message(1023, ANY),
    message(2047, ANY),
];
const COIN: &[Field] = &[scalar(1), scalar(2)];
const FEE: &[Field] = &[message(1, COIN), scalar(2), scalar(3), scalar(4)];
const BIT_ARRAY: &[Field] = &[scalar(1), scalar(2)];
const MODE_SINGLE: &[Field] = &[scalar(1)];
// Mode infos nest through `Multi`, so these tables are statics that refer
// to each other by address.
static MODE_MULTI: [Field; 2] = [message(1, BIT_ARRAY), message(2, &MODE_INFO)];
static MODE_INFO: [Field; 2] = [message(1, MODE_SINGLE), message(2, &MODE_MULTI)];
static SIGNER_INFO: [Field; 3] = [message(1, ANY), message(2, &MODE_INFO), scalar(3)];
/// `AuthInfo`: signer_infos, fee.
pub static AUTH_INFO: [Field; 2] = [message(1, &SIGNER_INFO), message(2, FEE)];
/// `MultiSignature`: signatures.
pub const MULTI_SIGNATURE: &[Field] = &[scalar(1)];
/// `Ed25519PubKey`: key.
pub const ED25519_PUB_KEY: &[Field] = &[scalar(1)];
/// `LegacyAminoPubKey`: threshold, public_keys.
pub const LEGACY_AMINO_PUB_KEY: &[Field] = &[scalar(1), message(2, ANY)];

/// `MsgSend`.
pub const MSG_SEND: &[Field] = &[scalar(1), scalar(2), message(3, COIN)];
const IN_OUT: &[Field] = &[scalar(1), message(2, COIN)];
/// `MsgMultiSend`.
pub const MSG_MULTI_SEND: &[Field] = &[message(1, IN_OUT), message(2, IN_OUT)];
/// `MsgExec`. Nested messages are checked when they are resolved.
pub const MSG_EXEC: &[Field] = &[scalar(1), message(2, ANY)];
/// `GenericAuthorization`.
pub const GENERIC_AUTHORIZATION: &[Field] = &[scalar(1)];
const GRANT: &[Field] = &[message(1, ANY), scalar(2)];
/// `MsgGrant`.
pub const MSG_GRANT: &[Field] = &[scalar(1), scalar(2), message(3, GRANT)];
/// `MsgRevoke`.
pub const MSG_REVOKE: &[Field] = &[scalar(1), scalar(2), scalar(3)];
/// `BasicAllowance`.
pub const BASIC_ALLOWANCE: &[Field] = &[message(1, COIN), scalar(2)];
/// `AllowedMsgAllowance`.
pub const ALLOWED_MSG_ALLOWANCE: &[Field] = &[message(1, ANY), scalar(2)];
/// `MsgGrantAllowance`.
pub const MSG_GRANT_ALLOWANCE: &[Field] = &[scalar(1), scalar(2), message(3, ANY)];
/// `MsgRevokeAllowance`.
pub const MSG_REVOKE_ALLOWANCE: &[Field] = &[scalar(1), scalar(2)];

/// Walks `bytes` against `fields`.
///
/// Returns the numbers of the non-critical unknown fields that were skipped.
/// With `allow_non_critical == false` any unknown field is an error.
pub fn check(
    bytes: &[u8],
    fields: &[Field],
    allow_non_critical: bool,
) -> Result<Vec<u64>, TxError> {
    let mut skipped = Vec::new();
    scan(bytes, fields, allow_non_critical, 0, &mut skipped)?;
    Ok(skipped)
}

fn scan(
    mut buf: &[u8],
    fields: &[Field],
    allow_non_critical: bool,
    depth: usize,
    skipped: &mut Vec<u64>,
) -> Result<(), TxError> {
    if depth > MAX_SCAN_DEPTH {
        return Err(TxError::Decode("message nesting too deep".into()));
    }
    while !buf.is_empty() {
        let key = read_varint(&mut buf)?;
        let number = key >> 3;
        let wire_type = key & 0x7;
        if number == 0 {
            return Err(TxError::Decode("field number 0 is invalid".into()));
        }
        let payload = skip_value(&mut buf, wire_type)?;

        match fields.iter().find(|f| f.number == number) {
            Some(field) => {
                if let (Some(nested), Some(payload)) = (field.nested, payload) {
                    scan(payload, nested, allow_non_critical, depth + 1, skipped)?;
                }
            }
            None if number & NON_CRITICAL_BIT != 0 && allow_non_critical => {
                skipped.push(number);
            }
            None if number & NON_CRITICAL_BIT != 0 => {
                return Err(TxError::Decode(format!(
                    "unknown non-critical field {number} not permitted here"
                )));
            }
            None => {
                return Err(TxError::Decode(format!("unknown critical field {number}")));
            }
        }
    }
    Ok(())
}

fn read_varint(buf: &mut &[u8]) -> Result<u64, TxError> {
    let mut value: u64 = 0;
    for shift in (0..64).step_by(7) {
        let (&byte, rest) = buf
            .split_first()
            .ok_or_else(|| TxError::Decode("truncated varint".into()))?;
        *buf = rest;
        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(TxError::Decode("varint overflow".into()))
}

fn take<'a>(buf: &mut &'a [u8], n: usize) -> Result<&'a [u8], TxError> {
    if buf.len() < n {
        return Err(TxError::Decode("truncated field".into()));
    }
    let (head, rest) = buf.split_at(n);
    *buf = rest;
    Ok(head)
}

/// Skips one value of `wire_type`, returning the payload of length-delimited values.
fn skip_value<'a>(buf: &mut &'a [u8], wire_type: u64) -> Result<Option<&'a [u8]>, TxError> {
    match wire_type {
        0 => read_varint(buf).map(|_| None),
        1 => take(buf, 8).map(|_| None),
        2 => {
            let len = usize::try_from(read_varint(buf)?)
                .map_err(|_| TxError::Decode("length overflow".into()))?;
            take(buf, len).map(Some)
        }
        5 => take(buf, 4).map(|_| None),
        other => Err(TxError::Decode(format!("unsupported wire type {other}"))),
    }
}
