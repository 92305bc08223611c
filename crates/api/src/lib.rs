// Path: crates/api/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]
//! # Ante API
//!
//! Core traits and interfaces for the admission pipeline. This crate defines
//! the stable contract between the decorator chain, the state layers and the
//! account/fee keepers.

/// The per-attempt gas meter.
pub mod gas;
/// The account and fee accessor the decorator chain consumes.
pub mod keeper;
/// State access, copy-on-write overlays and read-set recording.
pub mod state;
/// The ante context and decorator contract.
pub mod transaction;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::gas::GasMeter;
    pub use crate::keeper::{AccountFeeAccessor, BaseAccount};
    pub use crate::state::{StateAccess, StateOverlay};
    pub use crate::transaction::{AnteContext, AnteDecorator, Next, StageCost};
}
