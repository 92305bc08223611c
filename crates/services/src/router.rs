// Path: crates/services/src/router.rs
//! Executes resolved messages against state.

use crate::authz::AuthzKeeper;
use crate::bank::BankKeeper;
use crate::feegrant::FeeGrantKeeper;
use ante_api::state::StateAccess;
use ante_tx::{Msg, SdkMsg};
use ante_types::app::{Address, Event};
use ante_types::error::TxError;

/// Dispatches each message variant to the keeper that owns it.
///
/// The router writes straight into the state it is handed. Callers wrap it in
/// a scratch overlay so a failing message leaves nothing behind.
#[derive(Debug, Clone, Copy)]
pub struct MsgRouter {
    bank: BankKeeper,
    feegrant: FeeGrantKeeper,
    authz: AuthzKeeper,
}

impl MsgRouter {
    /// A router moving funds through `bank`.
    pub fn new(bank: BankKeeper) -> Self {
        Self {
            bank,
            feegrant: FeeGrantKeeper,
            authz: AuthzKeeper,
        }
    }

    /// Executes `msgs` in order and returns the events they emitted.
    pub fn execute(&self, state: &mut dyn StateAccess, msgs: &[&Msg], height: u64) -> Result<Vec<Event>, TxError> {
        let mut events = Vec::new();
        for msg in msgs {
            self.dispatch(state, msg, height, &mut events)?;
        }
        Ok(events)
    }

    fn dispatch(
        &self,
        state: &mut dyn StateAccess,
        msg: &Msg,
        height: u64,
        events: &mut Vec<Event>,
    ) -> Result<(), TxError> {
        let sender = msg
            .signers()?
            .first()
            .map(Address::to_string)
            .unwrap_or_default();
        events.push(
            Event::new("message")
                .attr("action", msg.type_url())
                .attr("sender", sender),
        );

        match msg {
            Msg::Send(send) => {
                let (from, to, amount) = send.parts()?;
                self.bank.send(state, &from, &to, &amount)?;
                events.push(transfer(&from, &to, &amount.to_string()));
            }
            Msg::MultiSend(multi) => {
                let (inputs, outputs) = multi.parts()?;
                self.bank.multi_send(state, &inputs, &outputs)?;
                let from = inputs.first().map(|(a, _)| *a).unwrap_or_default();
                for (to, amount) in &outputs {
                    events.push(transfer(&from, to, &amount.to_string()));
                }
            }
            Msg::Exec(exec) => {
                let grantee: Address = exec.grantee.parse()?;
                for nested in exec.nested()? {
                    self.authz.authorize(state, &grantee, nested, height)?;
                    self.dispatch(state, nested, height, events)?;
                }
                events.push(Event::new("exec").attr("grantee", exec.grantee.as_str()));
            }
            Msg::Grant(grant) => {
                let (granter, grantee) = grant.parties()?;
                self.authz.save_grant(state, &granter, &grantee, &grant.grant, height)?;
                events.push(
                    Event::new("grant")
                        .attr("granter", grant.granter.as_str())
                        .attr("grantee", grant.grantee.as_str())
                        .attr("msg_type_url", grant.grant.authorization.msg_type_url()),
                );
            }
            Msg::Revoke(revoke) => {
                let (granter, grantee) = revoke.parties()?;
                self.authz
                    .delete_grant(state, &granter, &grantee, &revoke.msg_type_url)?;
                events.push(
                    Event::new("revoke")
                        .attr("granter", revoke.granter.as_str())
                        .attr("grantee", revoke.grantee.as_str())
                        .attr("msg_type_url", revoke.msg_type_url.as_str()),
                );
            }
            Msg::GrantAllowance(grant) => {
                let (granter, grantee) = grant.parties()?;
                self.feegrant.grant(state, &granter, &grantee, &grant.allowance)?;
                events.push(
                    Event::new("set_feegrant")
                        .attr("granter", grant.granter.as_str())
                        .attr("grantee", grant.grantee.as_str()),
                );
            }
            Msg::RevokeAllowance(revoke) => {
                let (granter, grantee) = revoke.parties()?;
                self.feegrant.revoke(state, &granter, &grantee)?;
                events.push(
                    Event::new("revoke_feegrant")
                        .attr("granter", revoke.granter.as_str())
                        .attr("grantee", revoke.grantee.as_str()),
                );
            }
        }
        Ok(())
    }
}

fn transfer(from: &Address, to: &Address, amount: &str) -> Event {
    Event::new("transfer")
        .attr("sender", from.to_string())
        .attr("recipient", to.to_string())
        .attr("amount", amount)
}
