// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Ante Types
//!
//! This crate is the foundational library for the transaction admission
//! pipeline, containing the shared data structures, error types, state key
//! layout and configuration objects.
//!
//! ## Architectural Role
//!
//! As the base crate, `ante-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. This keeps the
//! dependency graph acyclic and gives a single canonical definition for
//! shared types like `Address`, `Coins`, `TxError` and `AnteParams`.

/// Application-level value types: addresses, coins, events and execution modes.
pub mod app;
/// The canonical, deterministic binary codec for persisted state values.
pub mod codec;
/// Shared configuration structures (`NodeConfig`, `AnteParams`, `DecodeLimits`).
pub mod config;
/// A unified set of all error types used across the pipeline.
pub mod error;
/// Constants and builders for well-known state keys.
pub mod keys;
