// Path: crates/services/src/authz.rs
//! Authz grants: permission for a grantee to execute messages for a granter.

use ante_api::state::{read_value, write_value, StateAccess};
use ante_tx::msg::Grant;
use ante_tx::{Msg, SdkMsg};
use ante_types::app::Address;
use ante_types::error::TxError;
use ante_types::keys::authz_grant_key;

/// Owns [`Grant`] records keyed by granter, grantee and message type.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthzKeeper;

impl AuthzKeeper {
    /// Loads a grant.
    pub fn get_grant(
        &self,
        state: &dyn StateAccess,
        granter: &Address,
        grantee: &Address,
        type_url: &str,
    ) -> Result<Option<Grant>, TxError> {
        Ok(read_value(state, &authz_grant_key(granter, grantee, type_url))?)
    }

    /// Stores a grant, replacing any previous grant for the same message type.
    pub fn save_grant(
        &self,
        state: &mut dyn StateAccess,
        granter: &Address,
        grantee: &Address,
        grant: &Grant,
        height: u64,
    ) -> Result<(), TxError> {
        if grant.is_expired(height) {
            return Err(TxError::Validation("grant expiration is in the past".into()));
        }
        let key = authz_grant_key(granter, grantee, grant.authorization.msg_type_url());
        Ok(write_value(state, &key, grant)?)
    }

    /// Deletes a grant.
    pub fn delete_grant(
        &self,
        state: &mut dyn StateAccess,
        granter: &Address,
        grantee: &Address,
        type_url: &str,
    ) -> Result<(), TxError> {
        if self.get_grant(state, granter, grantee, type_url)?.is_none() {
            return Err(TxError::Unauthorized(format!(
                "no authorization for {type_url} from {granter} to {grantee}"
            )));
        }
        Ok(state.delete(&authz_grant_key(granter, grantee, type_url))?)
    }

    /// Checks that `grantee` may execute `msg` at `height`.
    ///
    /// Every signer of the message must be the grantee itself or have granted
    /// the grantee an unexpired authorization for the message's type.
    pub fn authorize(
        &self,
        state: &dyn StateAccess,
        grantee: &Address,
        msg: &Msg,
        height: u64,
    ) -> Result<(), TxError> {
        for signer in msg.signers()? {
            if signer == *grantee {
                continue;
            }
            let grant = self
                .get_grant(state, &signer, grantee, msg.type_url())?
                .ok_or_else(|| {
                    TxError::Unauthorized(format!(
                        "{grantee} is not authorized to execute {} for {signer}",
                        msg.type_url()
                    ))
                })?;
            if grant.is_expired(height) {
                return Err(TxError::Unauthorized(format!(
                    "authorization for {} from {signer} expired",
                    msg.type_url()
                )));
            }
        }
        Ok(())
    }
}
