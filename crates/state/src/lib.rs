// Path: crates/state/src/lib.rs
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
//! # Ante State
//!
//! The committed store the admission pipeline reads from, the shared
//! read-through cache in front of it, and the pending write layers that hold
//! check-mode and deliver-mode changes between blocks.

pub mod backend;
pub mod cache;
pub mod layer;
pub mod store;

pub use backend::{KvBackend, MemBackend};
pub use cache::{CacheStats, ReadThroughCache};
pub use layer::{LayeredView, PendingLayer};
pub use store::CommittedStore;

#[cfg(test)]
mod tests;
