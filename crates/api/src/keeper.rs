// Path: crates/api/src/keeper.rs
//! The account and fee accessor consumed by the decorator chain.

use crate::state::StateAccess;
use ante_crypto::PublicKey;
use ante_types::app::{Address, Coins};
use ante_types::error::TxError;
use ante_tx::Msg;
use parity_scale_codec::{Decode, Encode};

/// A persisted account.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct BaseAccount {
    /// The account address.
    pub address: Address,
    /// The bound public key, set on the account's first signed transaction.
    pub pub_key: Option<PublicKey>,
    /// A number assigned at creation and bound into every sign document.
    pub account_number: u64,
    /// The replay-protection counter.
    pub sequence: u64,
}

/// Account, balance and fee-grant access for the decorator chain.
///
/// Every method takes the state layer explicitly, so the same accessor serves
/// the committed store, a parallel worker's recorder, and the per-attempt
/// overlay alike. Nothing is cached outside of the state passed in.
pub trait AccountFeeAccessor: Send + Sync {
    /// Loads an account.
    fn get_account(
        &self,
        state: &dyn StateAccess,
        address: &Address,
    ) -> Result<Option<BaseAccount>, TxError>;

    /// Stores an account.
    fn set_account(&self, state: &mut dyn StateAccess, account: &BaseAccount)
        -> Result<(), TxError>;

    /// The public key bound to an account, if any.
    fn get_pub_key(
        &self,
        state: &dyn StateAccess,
        address: &Address,
    ) -> Result<Option<PublicKey>, TxError> {
        Ok(self
            .get_account(state, address)?
            .and_then(|account| account.pub_key))
    }

    /// Binds a public key to an existing account.
    fn set_pub_key(
        &self,
        state: &mut dyn StateAccess,
        address: &Address,
        key: PublicKey,
    ) -> Result<(), TxError> {
        let mut account = self
            .get_account(state, address)?
            .ok_or_else(|| TxError::UnknownAccount(address.to_string()))?;
        account.pub_key = Some(key);
        self.set_account(state, &account)
    }

    /// Moves `fee` from `payer` to the fee collector.
    fn deduct_fee(
        &self,
        state: &mut dyn StateAccess,
        payer: &Address,
        fee: &Coins,
    ) -> Result<(), TxError>;

    /// Charges `fee` against the allowance `granter` gave `grantee`.
    ///
    /// `msgs` are the transaction's top-level messages; an allowance restricted
    /// to a message list checks messages nested in wrappers as well.
    fn consume_allowance(
        &self,
        state: &mut dyn StateAccess,
        granter: &Address,
        grantee: &Address,
        fee: &Coins,
        msgs: &[&Msg],
        height: u64,
    ) -> Result<(), TxError>;
}
