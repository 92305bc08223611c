// Path: crates/validator/src/ante/tests/mod.rs

use super::*;
use ante_api::state::StateOverlay;
use ante_api::transaction::SigVerifyMode;
use ante_services::{AccountKeeper, BankKeeper, GenesisState, StateAccountFeeAccessor};
use ante_state::CommittedStore;
use ante_test_utils::{address_of, keypair, multisig, multisig_address, GenesisBuilder, SendTx, CHAIN_ID, DENOM};
use ante_tx::builder::encode;
use ante_tx::proto::TxRaw;
use ante_tx::{MsgRegistry, Signer, TxDecoder};
use ante_types::app::{Address, ExecMode};
use ante_types::config::{AnteParams, DecodeLimits};
use prost::Message;

struct Harness {
    store: CommittedStore,
    accounts: StateAccountFeeAccessor,
    params: AnteParams,
    height: u64,
}

struct Run {
    result: Result<(), TxError>,
    gas_used: u64,
    deferred: usize,
}

impl Harness {
    fn new(genesis: GenesisState) -> Self {
        let bank = BankKeeper::new("fee_collector");
        let mut store = CommittedStore::in_memory(64);
        let changes = {
            let mut overlay = StateOverlay::new(&store);
            genesis.apply(&mut overlay, &bank).unwrap();
            overlay.into_ordered_batch()
        };
        store.commit(changes).unwrap();
        Self {
            store,
            accounts: StateAccountFeeAccessor::new(bank),
            params: AnteParams::default(),
            height: 1,
        }
    }

    /// Runs the default chain and commits its writes only when it accepts.
    fn run(&mut self, raw: &[u8], simulate: bool, sig_verify: SigVerifyMode) -> Run {
        let tx = TxDecoder::new(MsgRegistry::with_default_messages(), DecodeLimits::default())
            .decode(raw)
            .unwrap();
        let mode = if simulate { ExecMode::Simulate } else { ExecMode::Deliver };
        let (run, changes) = {
            let mut overlay = StateOverlay::new(&self.store);
            let mut ctx = AnteContext::new(mode, CHAIN_ID, self.height, &self.params, &mut overlay, &self.accounts)
                .with_max_key_depth(4)
                .with_sig_verify(sig_verify);
            let result = default_ante_chain().run(&mut ctx, &tx, simulate);
            let run = Run {
                gas_used: ctx.gas_meter.consumed(),
                deferred: ctx.deferred_signatures.len(),
                result,
            };
            (run, overlay.into_ordered_batch())
        };
        if run.result.is_ok() {
            self.store.commit(changes).unwrap();
        }
        run
    }

    fn sequence(&self, address: &Address) -> u64 {
        AccountKeeper.get(&self.store, address).unwrap().unwrap().sequence
    }

    fn balance(&self, address: &Address) -> u128 {
        BankKeeper::new("fee_collector")
            .balance(&self.store, address, DENOM)
            .unwrap()
    }
}

fn size_gas(raw: &[u8]) -> u64 {
    raw.len() as u64 * AnteParams::default().tx_size_cost_per_byte
}

#[test]
fn default_chain_satisfies_the_ordering_rule() {
    let chain = AnteChain::new(default_ante_stages()).unwrap();
    let names = chain.names();
    assert_eq!(names.first(), Some(&"SetUpContext"));
    assert_eq!(names.get(1), Some(&"ConsumeTxSizeGas"));
    assert_eq!(names.len(), 11);
    assert_eq!(names, default_ante_chain().names());

    let stages = default_ante_stages();
    for stage in stages.iter().skip(2) {
        assert_eq!(stage.cost(), StageCost::Structural, "{}", stage.name());
    }
}

#[test]
fn misordered_chains_are_rejected() {
    let structural_first: Vec<Box<dyn AnteDecorator>> = vec![
        Box::new(SetUpContextDecorator),
        Box::new(ValidateBasicDecorator),
        Box::new(ConsumeTxSizeGasDecorator),
    ];
    assert_eq!(
        AnteChain::new(structural_first).err(),
        Some(AnteChainError::StructuralBeforeSizeCharge("ValidateBasic"))
    );

    let missing: Vec<Box<dyn AnteDecorator>> = vec![Box::new(SetUpContextDecorator)];
    assert_eq!(AnteChain::new(missing).err(), Some(AnteChainError::MissingSizeCharge));

    let twice: Vec<Box<dyn AnteDecorator>> = vec![
        Box::new(ConsumeTxSizeGasDecorator),
        Box::new(ConsumeTxSizeGasDecorator),
    ];
    assert_eq!(
        AnteChain::new(twice).err(),
        Some(AnteChainError::DuplicateSizeCharge("ConsumeTxSizeGas"))
    );

    let late_setup: Vec<Box<dyn AnteDecorator>> = vec![
        Box::new(ConsumeTxSizeGasDecorator),
        Box::new(SetUpContextDecorator),
    ];
    assert_eq!(
        AnteChain::new(late_setup).err(),
        Some(AnteChainError::SetupAfterSizeCharge("SetUpContext"))
    );
}

#[test]
fn size_is_charged_before_signature_counting() {
    let alice = keypair(1);
    let mut h = Harness::new(GenesisBuilder::new().funded(&alice, 1_000_000).build());

    let tamper = |gas_limit: u64| {
        let signed = SendTx::new(Signer::Single(&alice), Address::new([7; 20]), 1)
            .fee(10, gas_limit)
            .sign();
        let mut raw = TxRaw::decode(signed.as_slice()).unwrap();
        raw.signatures.push(vec![0; 64]);
        encode(&raw)
    };

    // Too little gas for the bytes: the size charge fails first.
    let raw = tamper(100);
    let run = h.run(&raw, false, SigVerifyMode::Immediate);
    assert!(
        matches!(run.result, Err(TxError::OutOfGas { ref location, .. }) if location == "txSize"),
        "{:?}",
        run.result
    );

    // Enough gas: the size is paid, then the count mismatch rejects.
    let raw = tamper(1_000_000);
    let run = h.run(&raw, false, SigVerifyMode::Immediate);
    assert!(matches!(run.result, Err(TxError::Unauthorized(ref m)) if m.contains("wrong number of signatures")));
    assert_eq!(run.gas_used, size_gas(&raw));
}

#[test]
fn accepted_transaction_pays_size_and_signature_gas() {
    let alice = keypair(1);
    let mut h = Harness::new(GenesisBuilder::new().funded(&alice, 1_000_000).build());
    let addr = address_of(&alice);

    let raw = SendTx::new(Signer::Single(&alice), Address::new([7; 20]), 5)
        .fee(2_000, 200_000)
        .sign();
    let run = h.run(&raw, false, SigVerifyMode::Immediate);
    run.result.unwrap();
    assert_eq!(run.gas_used, size_gas(&raw) + 590);
    assert_eq!(h.sequence(&addr), 1);
    assert_eq!(h.balance(&addr), 1_000_000 - 2_000);
    assert_eq!(h.balance(&Address::module("fee_collector")), 2_000);

    let bound = AccountKeeper.get(&h.store, &addr).unwrap().unwrap().pub_key;
    assert_eq!(bound, Some(ante_crypto::PublicKey::Ed25519(alice.public_key())));

    // The same bytes again are a replay.
    let run = h.run(&raw, false, SigVerifyMode::Immediate);
    assert_eq!(run.result, Err(TxError::WrongSequence { expected: 1, got: 0 }));
    assert_eq!(h.balance(&addr), 1_000_000 - 2_000);
}

#[test]
fn bad_signature_rejects_and_keeps_nothing() {
    let alice = keypair(1);
    let mut h = Harness::new(GenesisBuilder::new().funded(&alice, 1_000_000).build());
    let signed = SendTx::new(Signer::Single(&alice), Address::new([7; 20]), 5).sign();
    let mut raw = TxRaw::decode(signed.as_slice()).unwrap();
    raw.signatures[0][0] ^= 0xff;
    let raw = encode(&raw);

    let run = h.run(&raw, false, SigVerifyMode::Immediate);
    assert!(matches!(run.result, Err(TxError::Unauthorized(_))));
    assert_eq!(h.sequence(&address_of(&alice)), 0);
    assert_eq!(h.balance(&address_of(&alice)), 1_000_000);
}

#[test]
fn deferred_mode_records_leaf_signatures() {
    let (a, b, c) = (keypair(1), keypair(2), keypair(3));
    let key = multisig(2, &[&a, &b, &c]).unwrap();
    let addr = multisig_address(&key);
    let mut h = Harness::new(GenesisBuilder::new().account(addr, ante_test_utils::stake(1_000_000)).build());

    let signer = Signer::Multi {
        key: &key,
        signers: vec![(0, &a), (2, &c)],
    };
    let raw = SendTx::new(signer, Address::new([7; 20]), 5).sign();
    let run = h.run(&raw, false, SigVerifyMode::Deferred);
    run.result.unwrap();
    assert_eq!(run.deferred, 2);
    // One verification charge per constituent that signed.
    assert_eq!(run.gas_used, size_gas(&raw) + 2 * 590);
}

#[test]
fn simulation_charges_placeholder_signatures() {
    let alice = keypair(1);
    let mut h = Harness::new(GenesisBuilder::new().funded_with_key(&alice, 1_000_000).build());
    let raw = SendTx::new(Signer::Single(&alice), Address::new([7; 20]), 5)
        .fee(1, 0)
        .unsigned();
    let run = h.run(&raw, true, SigVerifyMode::Immediate);
    run.result.unwrap();
    assert_eq!(run.gas_used, (raw.len() as u64 + 64) * 10 + 590);
}

#[test]
fn key_for_another_address_is_rejected() {
    let (alice, bob) = (keypair(1), keypair(2));
    let mut h = Harness::new(
        GenesisBuilder::new()
            .funded(&alice, 1_000_000)
            .funded(&bob, 1_000_000)
            .build(),
    );
    // Bob's message signed with Alice's key.
    let msg = ante_tx::msg::MsgSend::new(&address_of(&bob), &Address::new([7; 20]), &ante_test_utils::stake(1));
    let raw = encode(
        &ante_tx::TxBuilder::new()
            .message(&msg)
            .fee(&ante_test_utils::stake(10), 200_000)
            .sign(CHAIN_ID, &[ante_tx::SignerEntry::new(Signer::Single(&alice), 1, 0)]),
    );
    let run = h.run(&raw, false, SigVerifyMode::Immediate);
    assert!(matches!(run.result, Err(TxError::Unauthorized(ref m)) if m.contains("pubKey does not match")));
}

#[test]
fn multisig_constituents_count_toward_the_signature_limit() {
    let keys: Vec<_> = (1..=8).map(keypair).collect();
    let refs: Vec<_> = keys.iter().collect();
    let key = multisig(1, &refs).unwrap();
    let addr = multisig_address(&key);
    let mut h = Harness::new(GenesisBuilder::new().account(addr, ante_test_utils::stake(1_000_000)).build());

    let signer = Signer::Multi {
        key: &key,
        signers: vec![(0, &keys[0])],
    };
    let raw = SendTx::new(signer, Address::new([7; 20]), 5).sign();
    let run = h.run(&raw, false, SigVerifyMode::Immediate);
    assert_eq!(run.result, Err(TxError::TooManySignatures { got: 8, limit: 7 }));
}

#[test]
fn memo_length_counts_characters() {
    let alice = keypair(1);
    let mut h = Harness::new(GenesisBuilder::new().funded(&alice, 1_000_000).build());
    let ok = SendTx::new(Signer::Single(&alice), Address::new([7; 20]), 1)
        .memo("é".repeat(256))
        .sign();
    h.run(&ok, false, SigVerifyMode::Immediate).result.unwrap();

    let long = SendTx::new(Signer::Single(&alice), Address::new([7; 20]), 1)
        .account(0, 1)
        .memo("é".repeat(257))
        .sign();
    assert_eq!(
        h.run(&long, false, SigVerifyMode::Immediate).result,
        Err(TxError::MemoTooLarge { max: 256, got: 257 })
    );
}

#[test]
fn timeout_height_is_inclusive() {
    let alice = keypair(1);
    let mut h = Harness::new(GenesisBuilder::new().funded(&alice, 1_000_000).build());
    let raw = SendTx::new(Signer::Single(&alice), Address::new([7; 20]), 1)
        .timeout_height(1)
        .sign();

    h.height = 2;
    assert_eq!(
        h.run(&raw, false, SigVerifyMode::Immediate).result,
        Err(TxError::TimeoutHeight { timeout: 1, current: 2 })
    );
    assert_eq!(h.sequence(&address_of(&alice)), 0);

    h.height = 1;
    h.run(&raw, false, SigVerifyMode::Immediate).result.unwrap();
    assert_eq!(h.sequence(&address_of(&alice)), 1);
}

#[test]
fn gas_limit_above_block_maximum_rejects_before_charging() {
    let alice = keypair(1);
    let mut h = Harness::new(GenesisBuilder::new().funded(&alice, 1_000_000).build());
    h.params.max_block_gas = 100_000;

    let greedy = SendTx::new(Signer::Single(&alice), Address::new([7; 20]), 1)
        .fee(1_000, 100_001)
        .sign();
    let run = h.run(&greedy, false, SigVerifyMode::Immediate);
    assert_eq!(
        run.result,
        Err(TxError::GasLimitTooHigh {
            limit: 100_001,
            max: 100_000
        })
    );
    assert_eq!(run.gas_used, 0);
    assert_eq!(h.balance(&address_of(&alice)), 1_000_000);

    let fits = SendTx::new(Signer::Single(&alice), Address::new([7; 20]), 1)
        .fee(1_000, 100_000)
        .sign();
    h.run(&fits, false, SigVerifyMode::Immediate).result.unwrap();
}

#[test]
fn signature_gas_is_labelled_by_key_type() {
    let keys: Vec<_> = (1..=3).map(keypair).collect();
    let key = multisig(2, &[&keys[0], &keys[1], &keys[2]]).unwrap();
    let addr = multisig_address(&key);
    let build = |gas_limit: u64| {
        let signer = Signer::Multi {
            key: &key,
            signers: vec![(0, &keys[0]), (1, &keys[1])],
        };
        SendTx::new(signer, Address::new([7; 20]), 5)
            .fee(1_000, gas_limit)
            .sign()
    };

    // Enough for the size charge only. Both limits encode to the same width.
    let limit = size_gas(&build(1_000)) + 1;
    let raw = build(limit);
    assert_eq!(size_gas(&raw) + 1, limit);

    let mut h = Harness::new(GenesisBuilder::new().account(addr, ante_test_utils::stake(1_000_000)).build());
    let run = h.run(&raw, false, SigVerifyMode::Immediate);
    assert!(
        matches!(run.result, Err(TxError::OutOfGas { ref location, .. }) if location == "ante verify: multisig"),
        "{:?}",
        run.result
    );

    let alice = keypair(9);
    let mut h = Harness::new(GenesisBuilder::new().funded(&alice, 1_000_000).build());
    let build = |gas_limit: u64| {
        SendTx::new(Signer::Single(&alice), Address::new([7; 20]), 5)
            .fee(1_000, gas_limit)
            .sign()
    };
    let limit = size_gas(&build(1_000)) + 1;
    let run = h.run(&build(limit), false, SigVerifyMode::Immediate);
    assert!(
        matches!(run.result, Err(TxError::OutOfGas { ref location, .. }) if location == "ante verify: ed25519"),
        "{:?}",
        run.result
    );
}
