// Path: crates/services/src/feegrant.rs
//! Fee allowances: one account paying fees on behalf of another.

use ante_api::state::{read_value, write_value, StateAccess};
use ante_tx::msg::FeeAllowance;
use ante_tx::Msg;
use ante_types::app::{Address, Coins};
use ante_types::error::TxError;
use ante_types::keys::fee_allowance_key;

/// Owns [`FeeAllowance`] records keyed by granter and grantee.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeeGrantKeeper;

impl FeeGrantKeeper {
    /// Loads the allowance `granter` gave `grantee`.
    pub fn get(
        &self,
        state: &dyn StateAccess,
        granter: &Address,
        grantee: &Address,
    ) -> Result<Option<FeeAllowance>, TxError> {
        Ok(read_value(state, &fee_allowance_key(granter, grantee))?)
    }

    /// Stores a new allowance. An existing one must be revoked first.
    pub fn grant(
        &self,
        state: &mut dyn StateAccess,
        granter: &Address,
        grantee: &Address,
        allowance: &FeeAllowance,
    ) -> Result<(), TxError> {
        if self.get(state, granter, grantee)?.is_some() {
            return Err(TxError::FeeAllowance("fee allowance already exists".into()));
        }
        allowance.validate()?;
        Ok(write_value(state, &fee_allowance_key(granter, grantee), allowance)?)
    }

    /// Deletes an allowance.
    pub fn revoke(&self, state: &mut dyn StateAccess, granter: &Address, grantee: &Address) -> Result<(), TxError> {
        if self.get(state, granter, grantee)?.is_none() {
            return Err(TxError::FeeAllowance(format!(
                "no fee allowance from {granter} to {grantee}"
            )));
        }
        Ok(state.delete(&fee_allowance_key(granter, grantee))?)
    }

    /// Charges `fee` against the allowance, deleting it once spent.
    pub fn use_grant(
        &self,
        state: &mut dyn StateAccess,
        granter: &Address,
        grantee: &Address,
        fee: &Coins,
        msgs: &[&Msg],
        height: u64,
    ) -> Result<(), TxError> {
        let key = fee_allowance_key(granter, grantee);
        let mut allowance: FeeAllowance = read_value(state, &key)?.ok_or_else(|| {
            TxError::FeeAllowance(format!("{granter} does not allow to pay fees for {grantee}"))
        })?;

        if allowance.accept(fee, msgs, height)? {
            state.delete(&key)?;
        } else {
            write_value(state, &key, &allowance)?;
        }
        Ok(())
    }
}
