// Path: crates/services/src/accessor.rs

use crate::auth::AccountKeeper;
use crate::bank::BankKeeper;
use crate::feegrant::FeeGrantKeeper;
use ante_api::keeper::{AccountFeeAccessor, BaseAccount};
use ante_api::state::StateAccess;
use ante_tx::Msg;
use ante_types::app::{Address, Coins};
use ante_types::error::TxError;

/// The [`AccountFeeAccessor`] backed by the keepers in this crate.
#[derive(Debug, Clone, Copy)]
pub struct StateAccountFeeAccessor {
    accounts: AccountKeeper,
    bank: BankKeeper,
    feegrant: FeeGrantKeeper,
}

impl StateAccountFeeAccessor {
    /// An accessor that pays fees into `bank`'s fee collector.
    pub fn new(bank: BankKeeper) -> Self {
        Self {
            accounts: AccountKeeper,
            bank,
            feegrant: FeeGrantKeeper,
        }
    }
}

impl AccountFeeAccessor for StateAccountFeeAccessor {
    fn get_account(&self, state: &dyn StateAccess, address: &Address) -> Result<Option<BaseAccount>, TxError> {
        self.accounts.get(state, address)
    }

    fn set_account(&self, state: &mut dyn StateAccess, account: &BaseAccount) -> Result<(), TxError> {
        self.accounts.set(state, account)
    }

    fn deduct_fee(&self, state: &mut dyn StateAccess, payer: &Address, fee: &Coins) -> Result<(), TxError> {
        self.bank.deduct_fee(state, payer, fee)
    }

    fn consume_allowance(
        &self,
        state: &mut dyn StateAccess,
        granter: &Address,
        grantee: &Address,
        fee: &Coins,
        msgs: &[&Msg],
        height: u64,
    ) -> Result<(), TxError> {
        self.feegrant.use_grant(state, granter, grantee, fee, msgs, height)
    }
}
