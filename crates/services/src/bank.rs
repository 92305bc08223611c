// Path: crates/services/src/bank.rs
//! Balances and transfers.

use crate::auth::AccountKeeper;
use ante_api::state::{read_value, write_value, StateAccess};
use ante_types::app::{Address, Coin, Coins};
use ante_types::codec;
use ante_types::error::{StateError, TxError};
use ante_types::keys::{balance_key, balance_prefix};

/// Owns per-denomination balances.
#[derive(Debug, Clone, Copy)]
pub struct BankKeeper {
    accounts: AccountKeeper,
    fee_collector: Address,
}

impl BankKeeper {
    /// A keeper sending fees to the module account named `fee_collector`.
    pub fn new(fee_collector: &str) -> Self {
        Self {
            accounts: AccountKeeper,
            fee_collector: Address::module(fee_collector),
        }
    }

    /// The fee collector's address.
    pub fn fee_collector(&self) -> Address {
        self.fee_collector
    }

    /// The balance of one denomination.
    pub fn balance(&self, state: &dyn StateAccess, address: &Address, denom: &str) -> Result<u128, TxError> {
        Ok(read_value(state, &balance_key(address, denom))?.unwrap_or_default())
    }

    /// Every non-zero balance of `address`.
    pub fn balances(&self, state: &dyn StateAccess, address: &Address) -> Result<Coins, TxError> {
        let prefix = balance_prefix(address);
        let mut coins = Vec::new();
        for (key, value) in state.prefix_scan(&prefix)? {
            let denom = key
                .get(prefix.len()..)
                .and_then(|d| std::str::from_utf8(d).ok())
                .ok_or_else(|| StateError::InvalidValue("balance key denom".into()))?;
            let amount: u128 = codec::from_bytes_canonical(&value).map_err(StateError::Decode)?;
            coins.push(Coin::new(denom, amount));
        }
        Coins::new(coins)
    }

    fn set_balance(
        &self,
        state: &mut dyn StateAccess,
        address: &Address,
        denom: &str,
        amount: u128,
    ) -> Result<(), TxError> {
        let key = balance_key(address, denom);
        if amount == 0 {
            state.delete(&key)?;
        } else {
            write_value(state, &key, &amount)?;
        }
        Ok(())
    }

    /// Credits `coins` to `address` without a counterparty.
    pub fn mint(&self, state: &mut dyn StateAccess, address: &Address, coins: &Coins) -> Result<(), TxError> {
        for coin in coins.iter() {
            let current = self.balance(state, address, &coin.denom)?;
            let sum = current
                .checked_add(coin.amount)
                .ok_or_else(|| TxError::InvalidCoins(format!("{} balance overflow", coin.denom)))?;
            self.set_balance(state, address, &coin.denom, sum)?;
        }
        Ok(())
    }

    fn debit(&self, state: &mut dyn StateAccess, address: &Address, coins: &Coins) -> Result<(), TxError> {
        // Every denomination is checked before any is written.
        let mut remaining = Vec::new();
        for coin in coins.iter() {
            let current = self.balance(state, address, &coin.denom)?;
            let left = current.checked_sub(coin.amount).ok_or_else(|| {
                TxError::InsufficientFunds(format!(
                    "{address} has {current}{} but needs {coin}",
                    coin.denom
                ))
            })?;
            remaining.push((coin.denom.as_str(), left));
        }
        for (denom, left) in remaining {
            self.set_balance(state, address, denom, left)?;
        }
        Ok(())
    }

    /// Moves `coins` from `from` to `to`, creating the recipient's account.
    pub fn send(
        &self,
        state: &mut dyn StateAccess,
        from: &Address,
        to: &Address,
        coins: &Coins,
    ) -> Result<(), TxError> {
        self.debit(state, from, coins)?;
        self.accounts.get_or_create(state, to)?;
        self.mint(state, to, coins)
    }

    /// Executes a multi-party transfer. Inputs and outputs must already balance.
    pub fn multi_send(
        &self,
        state: &mut dyn StateAccess,
        inputs: &[(Address, Coins)],
        outputs: &[(Address, Coins)],
    ) -> Result<(), TxError> {
        for (address, coins) in inputs {
            self.debit(state, address, coins)?;
        }
        for (address, coins) in outputs {
            self.accounts.get_or_create(state, address)?;
            self.mint(state, address, coins)?;
        }
        Ok(())
    }

    /// Moves `fee` from `payer` into the fee collector.
    pub fn deduct_fee(&self, state: &mut dyn StateAccess, payer: &Address, fee: &Coins) -> Result<(), TxError> {
        if self.accounts.get(state, payer)?.is_none() {
            return Err(TxError::UnknownAccount(format!("fee payer {payer} does not exist")));
        }
        if fee.is_zero() {
            return Ok(());
        }
        self.debit(state, payer, fee).map_err(|e| match e {
            TxError::InsufficientFunds(reason) => {
                TxError::InsufficientFunds(format!("insufficient funds to pay fees: {reason}"))
            }
            other => other,
        })?;
        self.mint(state, &self.fee_collector, fee)
    }
}
