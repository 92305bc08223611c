// Path: crates/services/src/auth.rs
//! Account records: numbers, sequences and bound public keys.

use ante_api::keeper::BaseAccount;
use ante_api::state::{read_value, write_value, StateAccess};
use ante_types::app::Address;
use ante_types::error::TxError;
use ante_types::keys::{account_key, NEXT_ACCOUNT_NUMBER_KEY};

/// Reads and writes [`BaseAccount`] records.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountKeeper;

impl AccountKeeper {
    /// Loads an account.
    pub fn get(&self, state: &dyn StateAccess, address: &Address) -> Result<Option<BaseAccount>, TxError> {
        Ok(read_value(state, &account_key(address))?)
    }

    /// Stores an account.
    pub fn set(&self, state: &mut dyn StateAccess, account: &BaseAccount) -> Result<(), TxError> {
        Ok(write_value(state, &account_key(&account.address), account)?)
    }

    fn next_account_number(&self, state: &mut dyn StateAccess) -> Result<u64, TxError> {
        let next: u64 = read_value(state, NEXT_ACCOUNT_NUMBER_KEY)?.unwrap_or_default();
        let bumped = next
            .checked_add(1)
            .ok_or_else(|| TxError::Internal("account number overflow".into()))?;
        write_value(state, NEXT_ACCOUNT_NUMBER_KEY, &bumped)?;
        Ok(next)
    }

    /// Creates a fresh account at sequence zero. Fails if one exists.
    pub fn create(&self, state: &mut dyn StateAccess, address: &Address) -> Result<BaseAccount, TxError> {
        if self.get(state, address)?.is_some() {
            return Err(TxError::Validation(format!("account {address} already exists")));
        }
        let account = BaseAccount {
            address: *address,
            pub_key: None,
            account_number: self.next_account_number(state)?,
            sequence: 0,
        };
        self.set(state, &account)?;
        Ok(account)
    }

    /// Loads an account, creating it if it does not exist yet.
    pub fn get_or_create(
        &self,
        state: &mut dyn StateAccess,
        address: &Address,
    ) -> Result<BaseAccount, TxError> {
        match self.get(state, address)? {
            Some(account) => Ok(account),
            None => self.create(state, address),
        }
    }
}
