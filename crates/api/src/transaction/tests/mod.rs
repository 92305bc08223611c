// Path: crates/api/src/transaction/tests/mod.rs

use crate::keeper::{AccountFeeAccessor, BaseAccount};
use crate::state::{StateAccess, StateOverlay};
use crate::transaction::{AnteContext, AnteDecorator, Next, StageCost};
use ante_crypto::{Ed25519Keypair, PublicKey};
use ante_tx::builder::{encode, Signer, SignerEntry, TxBuilder};
use ante_tx::msg::MsgSend;
use ante_tx::{DecodedTx, Msg, MsgRegistry, TxDecoder};
use ante_types::app::{Address, Coin, Coins, ExecMode};
use ante_types::config::{AnteParams, DecodeLimits};
use ante_types::error::{StateError, TxError};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
struct MemState(BTreeMap<Vec<u8>, Vec<u8>>);

impl StateAccess for MemState {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.0.get(key).cloned())
    }
    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.0.insert(key.to_vec(), value.to_vec());
        Ok(())
    }
    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.0.remove(key);
        Ok(())
    }
    fn prefix_scan(&self, _prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StateError> {
        Ok(Vec::new())
    }
}

struct NoAccounts;

impl AccountFeeAccessor for NoAccounts {
    fn get_account(&self, _: &dyn StateAccess, _: &Address) -> Result<Option<BaseAccount>, TxError> {
        Ok(None)
    }
    fn set_account(&self, _: &mut dyn StateAccess, _: &BaseAccount) -> Result<(), TxError> {
        Ok(())
    }
    fn deduct_fee(&self, _: &mut dyn StateAccess, _: &Address, _: &Coins) -> Result<(), TxError> {
        Ok(())
    }
    fn consume_allowance(
        &self,
        _: &mut dyn StateAccess,
        _: &Address,
        _: &Address,
        _: &Coins,
        _: &[&Msg],
        _: u64,
    ) -> Result<(), TxError> {
        Ok(())
    }
}

/// Records its name into a shared log and optionally rejects.
struct Recorder {
    name: &'static str,
    log: std::sync::Arc<Mutex<Vec<&'static str>>>,
    reject: bool,
}

impl AnteDecorator for Recorder {
    fn name(&self) -> &'static str {
        self.name
    }
    fn cost(&self) -> StageCost {
        StageCost::Setup
    }
    fn ante_handle(
        &self,
        ctx: &mut AnteContext<'_>,
        tx: &DecodedTx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), TxError> {
        self.log.lock().unwrap().push(self.name);
        ctx.state.insert(self.name.as_bytes(), b"ran")?;
        if self.reject {
            return Err(TxError::Validation(format!("{} rejected", self.name)));
        }
        next.run(ctx, tx, simulate)
    }
}

fn sample_tx() -> DecodedTx {
    let key = Ed25519Keypair::from_seed([3; 32]);
    let from = PublicKey::Ed25519(key.public_key()).address();
    let stake = Coins::from(Coin::new("stake", 5));
    let raw = TxBuilder::new()
        .message(&MsgSend::new(&from, &Address::new([9; 20]), &stake))
        .fee(&stake, 100_000)
        .sign("ante-test", &[SignerEntry::new(Signer::Single(&key), 0, 0)]);
    TxDecoder::new(MsgRegistry::with_default_messages(), DecodeLimits::default())
        .decode(&encode(&raw))
        .unwrap()
}

fn chain(names: &[(&'static str, bool)], log: &std::sync::Arc<Mutex<Vec<&'static str>>>) -> Vec<Box<dyn AnteDecorator>> {
    names
        .iter()
        .map(|(name, reject)| {
            Box::new(Recorder {
                name: *name,
                log: log.clone(),
                reject: *reject,
            }) as Box<dyn AnteDecorator>
        })
        .collect()
}

#[test]
fn continuation_runs_stages_in_order() {
    let log = Default::default();
    let stages = chain(&[("a", false), ("b", false), ("c", false)], &log);
    let tx = sample_tx();
    let params = AnteParams::default();
    let mut state = MemState::default();
    let mut ctx = AnteContext::new(ExecMode::Check, "ante-test", 1, &params, &mut state, &NoAccounts);

    Next::new(&stages).run(&mut ctx, &tx, false).unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
}

#[test]
fn rejection_short_circuits_and_overlay_is_discarded() {
    let log = Default::default();
    let stages = chain(&[("a", false), ("b", true), ("c", false)], &log);
    let tx = sample_tx();
    let params = AnteParams::default();
    let base = MemState::default();
    let mut overlay = StateOverlay::new(&base);

    let result = {
        let mut ctx = AnteContext::new(ExecMode::Deliver, "ante-test", 1, &params, &mut overlay, &NoAccounts);
        Next::new(&stages).run(&mut ctx, &tx, false)
    };
    assert!(matches!(result, Err(TxError::Validation(_))));
    assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
    // The scratch layer saw the writes; the base never does.
    assert_eq!(overlay.len(), 2);
    drop(overlay);
    assert!(base.0.is_empty());
}

#[test]
fn empty_continuation_accepts() {
    let tx = sample_tx();
    let params = AnteParams::default();
    let mut state = MemState::default();
    let mut ctx = AnteContext::new(ExecMode::Check, "ante-test", 1, &params, &mut state, &NoAccounts);
    Next::end().run(&mut ctx, &tx, false).unwrap();
}

#[test]
fn context_meter_has_no_budget_before_setup() {
    let params = AnteParams::default();
    let mut state = MemState::default();
    let mut ctx = AnteContext::new(ExecMode::Check, "ante-test", 1, &params, &mut state, &NoAccounts);
    assert!(ctx.gas_meter.consume(1, "early").is_err());
}

#[test]
fn supplied_keys_are_parsed_once() {
    let tx = sample_tx();
    let params = AnteParams::default();
    let mut state = MemState::default();
    let mut ctx = AnteContext::new(ExecMode::Check, "ante-test", 1, &params, &mut state, &NoAccounts);

    let keys = ctx.supplied_keys(&tx).unwrap().to_vec();
    assert_eq!(keys.len(), 1);
    let expected = PublicKey::Ed25519(Ed25519Keypair::from_seed([3; 32]).public_key());
    assert_eq!(keys[0], Some(expected));
    assert_eq!(ctx.supplied_keys(&tx).unwrap().len(), 1);
}
