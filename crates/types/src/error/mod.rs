// Path: crates/types/src/error/mod.rs
//! Core error types for the admission pipeline.

use thiserror::Error;

/// Errors related to the state store or a state overlay.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The requested key was not found in the state.
    #[error("Key not found: {0}")]
    KeyNotFound(String),
    /// A stored value could not be decoded.
    #[error("Failed to decode state value: {0}")]
    Decode(String),
    /// An error occurred in the state backend.
    #[error("State backend error: {0}")]
    Backend(String),
    /// The provided value was invalid.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A configuration field holds a value outside its permitted range.
    #[error("Invalid config value for '{field}': {reason}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// The configuration document could not be parsed.
    #[error("Failed to parse config: {0}")]
    Parse(String),
}

/// The coarse classification of a transaction rejection.
///
/// The first five classes are expected outcomes for untrusted input and are
/// reported to the submitter as-is. `Internal` means the node itself
/// misbehaved and is always logged with full context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Wire bytes did not decode into a well-formed transaction.
    Decode,
    /// The transaction is well-formed but violates a stateless or stateful rule.
    Validation,
    /// The gas budget was exhausted or the gas limit is unusable.
    InsufficientGas,
    /// A signature, public key or sequence check failed.
    Authentication,
    /// A balance or fee allowance could not cover the requested amount.
    InsufficientFunds,
    /// An invariant inside the node was violated.
    Internal,
}

impl ErrorClass {
    /// A stable, lowercase label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::Decode => "decode",
            ErrorClass::Validation => "validation",
            ErrorClass::InsufficientGas => "insufficient_gas",
            ErrorClass::Authentication => "authentication",
            ErrorClass::InsufficientFunds => "insufficient_funds",
            ErrorClass::Internal => "internal",
        }
    }

    /// Returns true for rejections that untrusted input is allowed to cause.
    pub fn is_expected(&self) -> bool {
        !matches!(self, ErrorClass::Internal)
    }
}

/// Errors that can occur while admitting a transaction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxError {
    /// The raw bytes could not be decoded.
    #[error("tx parse error: {0}")]
    Decode(String),
    /// A message carried an empty, unknown or undecodable type identifier.
    #[error("unresolved message '{type_url}': {reason}")]
    UnresolvedMessage {
        /// The type identifier as it appeared on the wire.
        type_url: String,
        /// Why resolution failed.
        reason: String,
    },
    /// A hard decoding bound was exceeded.
    #[error("tx exceeds limit: {0}")]
    LimitExceeded(String),
    /// A generic validation failure.
    #[error("invalid request: {0}")]
    Validation(String),
    /// An address failed to parse or is not permitted in this position.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    /// A coin amount or denomination is invalid.
    #[error("invalid coins: {0}")]
    InvalidCoins(String),
    /// The memo is longer than permitted.
    #[error("maximum number of characters is {max} but received {got} characters")]
    MemoTooLarge {
        /// The configured maximum.
        max: u64,
        /// The memo's character count.
        got: u64,
    },
    /// The transaction's timeout height has passed.
    #[error("block height {current} is greater than tx timeout height {timeout}")]
    TimeoutHeight {
        /// The configured timeout height.
        timeout: u64,
        /// The height at which admission was attempted.
        current: u64,
    },
    /// The gas limit exceeds the block maximum.
    #[error("tx gas limit {limit} exceeds block max gas {max}")]
    GasLimitTooHigh {
        /// The gas limit from the fee.
        limit: u64,
        /// The configured block maximum.
        max: u64,
    },
    /// Too many signatures, counting multisig constituents.
    #[error("signatures: {got}, limit: {limit}")]
    TooManySignatures {
        /// The signature count after expanding multisig keys.
        got: u64,
        /// The configured limit.
        limit: u64,
    },
    /// Gas ran out while performing the named operation.
    #[error("out of gas in location: {location}; gasWanted: {limit}, gasUsed: {used}")]
    OutOfGas {
        /// The label passed to the failing `consume` call.
        location: String,
        /// The meter's limit.
        limit: u64,
        /// The consumed gas when the failure was recorded.
        used: u64,
    },
    /// The offered fee is below the node's minimum.
    #[error("insufficient fee; got: {got} required: {required}")]
    InsufficientFee {
        /// The fee offered by the transaction.
        got: String,
        /// The minimum fee for the requested gas limit.
        required: String,
    },
    /// A balance could not cover the requested amount.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),
    /// A signature or public key check failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// A signer's sequence does not match the account.
    #[error("account sequence mismatch, expected {expected}, got {got}")]
    WrongSequence {
        /// The sequence stored for the account.
        expected: u64,
        /// The sequence carried by the signer info.
        got: u64,
    },
    /// A signer has no account in state.
    #[error("account {0} does not exist")]
    UnknownAccount(String),
    /// A fee grant is missing, expired or does not cover the fee.
    #[error("fee allowance: {0}")]
    FeeAllowance(String),
    /// An error from the underlying state.
    #[error("state error: {0}")]
    State(#[from] StateError),
    /// An invariant inside the node was violated.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TxError {
    /// Returns the coarse classification of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            TxError::Decode(_) | TxError::UnresolvedMessage { .. } | TxError::LimitExceeded(_) => {
                ErrorClass::Decode
            }
            TxError::Validation(_)
            | TxError::InvalidAddress(_)
            | TxError::InvalidCoins(_)
            | TxError::MemoTooLarge { .. }
            | TxError::TimeoutHeight { .. }
            | TxError::GasLimitTooHigh { .. }
            | TxError::TooManySignatures { .. } => ErrorClass::Validation,
            TxError::OutOfGas { .. } => ErrorClass::InsufficientGas,
            TxError::InsufficientFee { .. }
            | TxError::InsufficientFunds(_)
            | TxError::FeeAllowance(_) => ErrorClass::InsufficientFunds,
            TxError::Unauthorized(_)
            | TxError::WrongSequence { .. }
            | TxError::UnknownAccount(_) => ErrorClass::Authentication,
            TxError::State(_) | TxError::Internal(_) => ErrorClass::Internal,
        }
    }

    /// Returns a stable numeric code for this error, suitable for clients.
    pub fn code(&self) -> u32 {
        match self {
            TxError::Internal(_) | TxError::State(_) => 1,
            TxError::Decode(_) => 2,
            TxError::Unauthorized(_) => 4,
            TxError::InsufficientFunds(_) => 5,
            TxError::UnresolvedMessage { .. } => 6,
            TxError::InvalidAddress(_) => 7,
            TxError::UnknownAccount(_) => 9,
            TxError::InvalidCoins(_) => 10,
            TxError::OutOfGas { .. } => 11,
            TxError::MemoTooLarge { .. } => 12,
            TxError::InsufficientFee { .. } => 13,
            TxError::TooManySignatures { .. } => 15,
            TxError::Validation(_) => 18,
            TxError::LimitExceeded(_) => 21,
            TxError::TimeoutHeight { .. } => 30,
            TxError::WrongSequence { .. } => 32,
            TxError::FeeAllowance(_) => 38,
            TxError::GasLimitTooHigh { .. } => 41,
        }
    }
}
