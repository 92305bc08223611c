// Path: crates/test_utils/src/genesis.rs
//! A builder for genesis documents.

use crate::fixtures::{address_of, stake};
use ante_crypto::Ed25519Keypair;
use ante_services::{GenesisAccount, GenesisState};
use ante_types::app::{Address, Coins};

/// Collects genesis accounts in account-number order.
#[derive(Debug, Default, Clone)]
pub struct GenesisBuilder {
    accounts: Vec<GenesisAccount>,
}

impl GenesisBuilder {
    /// An empty genesis.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account holding `balances` with no bound key.
    pub fn account(mut self, address: Address, balances: Coins) -> Self {
        self.accounts.push(GenesisAccount {
            address,
            balances,
            pub_key: None,
            sequence: 0,
        });
        self
    }

    /// Adds `key`'s account holding `amount` stake, key unbound.
    pub fn funded(self, key: &Ed25519Keypair, amount: u128) -> Self {
        self.account(address_of(key), stake(amount))
    }

    /// Adds `key`'s account holding `amount` stake with the key bound.
    pub fn funded_with_key(mut self, key: &Ed25519Keypair, amount: u128) -> Self {
        self.accounts.push(GenesisAccount {
            address: address_of(key),
            balances: stake(amount),
            pub_key: Some(hex::encode(key.public_key().as_bytes())),
            sequence: 0,
        });
        self
    }

    /// The genesis document.
    pub fn build(self) -> GenesisState {
        GenesisState {
            accounts: self.accounts,
        }
    }
}
