// Path: crates/test_utils/src/txs.rs
//! Ready-to-submit transactions.

use crate::fixtures::{stake, CHAIN_ID};
use ante_tx::builder::encode;
use ante_tx::msg::MsgSend;
use ante_tx::{Signer, SignerEntry, TxBuilder};
use ante_types::app::Address;

/// A single-message transfer, described field by field.
#[derive(Debug, Clone)]
pub struct SendTx<'a> {
    /// Who signs and pays.
    pub signer: Signer<'a>,
    /// The recipient.
    pub to: Address,
    /// Stake transferred.
    pub amount: u128,
    /// Stake offered as fee.
    pub fee: u128,
    /// The fee's gas limit.
    pub gas_limit: u64,
    /// The signer's account number.
    pub account_number: u64,
    /// The signer's sequence.
    pub sequence: u64,
    /// Free-form note.
    pub memo: String,
    /// Last height at which the tx may be included; 0 for none.
    pub timeout_height: u64,
}

impl<'a> SendTx<'a> {
    /// A transfer of `amount` stake with a fee of 1_000 stake and 200_000 gas.
    pub fn new(signer: Signer<'a>, to: Address, amount: u128) -> Self {
        Self {
            signer,
            to,
            amount,
            fee: 1_000,
            gas_limit: 200_000,
            account_number: 0,
            sequence: 0,
            memo: String::new(),
            timeout_height: 0,
        }
    }

    /// Sets the account number and sequence.
    pub fn account(mut self, account_number: u64, sequence: u64) -> Self {
        self.account_number = account_number;
        self.sequence = sequence;
        self
    }

    /// Sets the fee and gas limit.
    pub fn fee(mut self, fee: u128, gas_limit: u64) -> Self {
        self.fee = fee;
        self.gas_limit = gas_limit;
        self
    }

    /// Sets the memo.
    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Sets the timeout height.
    pub fn timeout_height(mut self, height: u64) -> Self {
        self.timeout_height = height;
        self
    }

    fn builder(&self) -> TxBuilder {
        let msg = MsgSend::new(&self.signer.address(), &self.to, &stake(self.amount));
        TxBuilder::new()
            .message(&msg)
            .memo(self.memo.clone())
            .timeout_height(self.timeout_height)
            .fee(&stake(self.fee), self.gas_limit)
    }

    fn entry(&self) -> SignerEntry<'a> {
        SignerEntry::new(self.signer.clone(), self.account_number, self.sequence)
    }

    /// Signed wire bytes.
    pub fn sign(&self) -> Vec<u8> {
        encode(&self.builder().sign(CHAIN_ID, &[self.entry()]))
    }

    /// Wire bytes with an empty placeholder signature, for simulation.
    pub fn unsigned(&self) -> Vec<u8> {
        encode(&self.builder().unsigned(&[self.entry()]))
    }
}

/// Signed wire bytes transferring `amount` stake from `signer` to `to`.
pub fn send_tx(signer: Signer<'_>, to: Address, amount: u128, account_number: u64, sequence: u64) -> Vec<u8> {
    SendTx::new(signer, to, amount)
        .account(account_number, sequence)
        .sign()
}
