// Path: crates/test_utils/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Ante Test Utilities
//!
//! Deterministic fixtures shared by the admission tests: keys derived from a
//! one-byte seed, a genesis builder and helpers that sign ready-to-submit
//! transactions.

pub mod assertions;
pub mod fixtures;
pub mod genesis;
pub mod txs;

pub use fixtures::{
    address_of, identity_commitment_signature, keypair, multisig, multisig_address, stake, CHAIN_ID, DENOM,
};
pub use genesis::GenesisBuilder;
pub use txs::{send_tx, SendTx};
