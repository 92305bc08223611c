// Path: crates/services/src/genesis.rs
//! Initial accounts and balances, loaded from JSON.

use crate::auth::AccountKeeper;
use crate::bank::BankKeeper;
use ante_api::state::StateAccess;
use ante_crypto::{Ed25519PublicKey, PublicKey};
use ante_types::app::{Address, Coins};
use ante_types::error::TxError;
use serde::{Deserialize, Serialize};

/// One account in the genesis file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GenesisAccount {
    /// The account address, hex encoded.
    pub address: Address,
    /// Initial balances.
    #[serde(default)]
    pub balances: Coins,
    /// An ed25519 public key to bind up front, hex encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_key: Option<String>,
    /// The starting sequence.
    #[serde(default)]
    pub sequence: u64,
}

/// The genesis file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct GenesisState {
    /// Accounts in account-number order.
    #[serde(default)]
    pub accounts: Vec<GenesisAccount>,
}

impl GenesisState {
    /// Parses a genesis file.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Writes every account and balance into `state`.
    pub fn apply(&self, state: &mut dyn StateAccess, bank: &BankKeeper) -> Result<(), TxError> {
        let accounts = AccountKeeper;
        for entry in &self.accounts {
            entry.balances.validate()?;
            let mut account = accounts.create(state, &entry.address)?;
            account.sequence = entry.sequence;
            if let Some(hex_key) = &entry.pub_key {
                let key = parse_pub_key(hex_key)?;
                if key.address() != entry.address {
                    return Err(TxError::Validation(format!(
                        "genesis key does not belong to {}",
                        entry.address
                    )));
                }
                account.pub_key = Some(key);
            }
            accounts.set(state, &account)?;
            bank.mint(state, &entry.address, &entry.balances)?;
        }
        tracing::info!(target: "genesis", accounts = self.accounts.len(), "applied genesis");
        Ok(())
    }
}

fn parse_pub_key(hex_key: &str) -> Result<PublicKey, TxError> {
    let bytes = hex::decode(hex_key)
        .map_err(|e| TxError::Validation(format!("genesis pub_key: {e}")))?;
    let key = Ed25519PublicKey::from_slice(&bytes).map_err(TxError::from)?;
    Ok(PublicKey::Ed25519(key))
}
