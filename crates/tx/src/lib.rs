// Path: crates/tx/src/lib.rs
//! # Ante Transaction Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free code. Every byte it handles comes from an untrusted peer, so
//! panics are disallowed in non-test code.
#![forbid(unsafe_code)]
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

pub mod builder;
pub mod decoder;
pub mod msg;
pub mod proto;
pub mod pubkey;
pub mod tx;
pub mod unknown_fields;

pub use builder::{Signer, SignerEntry, TxBuilder};
pub use decoder::TxDecoder;
pub use msg::{MessageContainer, Msg, MsgRegistry, Resolution, SdkMsg};
pub use tx::{DecodedTx, Fee, SignerInfoData};

#[cfg(test)]
mod tests;
