// Path: crates/services/src/lib.rs
#![forbid(unsafe_code)]
//! # Ante Services
//!
//! The keepers that own persisted accounts, balances, fee allowances and authz
//! grants, the [`AccountFeeAccessor`](ante_api::keeper::AccountFeeAccessor)
//! implementation the decorator chain consumes, and the router that executes
//! admitted messages.

pub mod auth;
pub mod authz;
pub mod bank;
pub mod feegrant;
pub mod genesis;
pub mod router;

mod accessor;

pub use accessor::StateAccountFeeAccessor;
pub use auth::AccountKeeper;
pub use authz::AuthzKeeper;
pub use bank::BankKeeper;
pub use feegrant::FeeGrantKeeper;
pub use genesis::{GenesisAccount, GenesisState};
pub use router::MsgRouter;

#[cfg(test)]
mod tests;
