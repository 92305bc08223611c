// Path: crates/validator/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
#![deny(missing_docs)]

//! # Ante Validator
//!
//! The transaction admission pipeline: the ordered ante decorator chain,
//! batched signature verification, the fault-recovery middleware and the
//! engine that ties them to the committed store.

/// The admission engine.
pub mod admission;
/// The ante decorators and the ordered chain.
pub mod ante;
/// Batched signature verification with per-transaction write-back.
pub mod batch;
/// Metrics sink registration.
pub mod metrics;
/// Panic capture around admission attempts.
pub mod recovery;

pub use admission::{AdmissionEngine, AdmitFailure, AdmitOutcome, AdmitResult, EngineError};
pub use ante::{default_ante_chain, AnteChain, AnteChainError};
pub use recovery::FaultRecovery;
