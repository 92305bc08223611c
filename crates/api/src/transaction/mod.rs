// Path: crates/api/src/transaction/mod.rs
//! The ante context and the decorator contract.

/// The mutable context threaded through the decorator chain.
pub mod context;
/// The decorator trait and its continuation.
pub mod decorator;

pub use context::{AnteContext, DeferredSignature, SigVerifyMode};
pub use decorator::{AnteDecorator, Next, StageCost};

#[cfg(test)]
mod tests;
