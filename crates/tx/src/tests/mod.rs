// Path: crates/tx/src/tests/mod.rs

use crate::builder::{encode, Signer, SignerEntry, TxBuilder};
use crate::decoder::TxDecoder;
use crate::msg::{bank::MsgSend, MsgRegistry, SdkMsg};
use crate::proto::{self, Any};
use crate::pubkey::{self, MULTISIG_PUBKEY_TYPE_URL};
use ante_crypto::{Ed25519Keypair, MultisigPublicKey, PublicKey};
use ante_types::app::{Coin, Coins};
use ante_types::config::DecodeLimits;
use ante_types::error::{ErrorClass, TxError};
use prost::Message;
use proptest::prelude::*;

const CHAIN: &str = "ante-test";

fn decoder() -> TxDecoder {
    TxDecoder::new(MsgRegistry::with_default_messages(), DecodeLimits::default())
}

fn kp(seed: u8) -> Ed25519Keypair {
    Ed25519Keypair::from_seed([seed; 32])
}

fn stake(n: u128) -> Coins {
    Coins::from(Coin::new("stake", n))
}

fn signed_send(from: &Ed25519Keypair) -> Vec<u8> {
    let signer = Signer::Single(from);
    let msg = MsgSend::new(&signer.address(), &kp(99).public_key_address(), &stake(5));
    let raw = TxBuilder::new()
        .message(&msg)
        .memo("hi")
        .fee(&stake(10), 200_000)
        .sign(CHAIN, &[SignerEntry::new(signer, 0, 0)]);
    encode(&raw)
}

trait KeyAddress {
    fn public_key_address(&self) -> ante_types::app::Address;
}

impl KeyAddress for Ed25519Keypair {
    fn public_key_address(&self) -> ante_types::app::Address {
        PublicKey::Ed25519(self.public_key()).address()
    }
}

fn raw_with_messages(messages: Vec<Any>) -> Vec<u8> {
    let signer = kp(1);
    let mut b = TxBuilder::new().fee(&stake(1), 100_000);
    for m in messages {
        b = b.any(m);
    }
    encode(&b.sign(CHAIN, &[SignerEntry::new(Signer::Single(&signer), 0, 0)]))
}

#[test]
fn decodes_a_signed_transaction() {
    let signer = kp(1);
    let tx = decoder().decode(&signed_send(&signer)).unwrap();
    assert_eq!(tx.messages.len(), 1);
    assert_eq!(tx.memo, "hi");
    assert_eq!(tx.fee.gas_limit, 200_000);
    assert_eq!(tx.fee.amount, stake(10));
    assert_eq!(tx.signers().unwrap(), vec![signer.public_key_address()]);
    assert_eq!(tx.fee_payer().unwrap(), signer.public_key_address());
    assert_eq!(tx.signer_infos.len(), tx.signatures.len());

    let pk = tx.signer_infos[0].public_key(4).unwrap().unwrap();
    let sig = tx.signature_data(0).unwrap();
    assert!(pk.verify(&tx.sign_bytes(CHAIN, 0), &sig).is_ok());
    assert!(pk.verify(&tx.sign_bytes("other-chain", 0), &sig).is_err());
}

#[test]
fn empty_and_unknown_type_identifiers_reject_at_decode() {
    for type_url in ["", "/unknown.Msg"] {
        let raw = raw_with_messages(vec![Any {
            type_url: type_url.into(),
            value: vec![],
        }]);
        let err = decoder().decode(&raw).unwrap_err();
        assert!(matches!(err, TxError::UnresolvedMessage { .. }), "{err}");
        assert_eq!(err.class(), ErrorClass::Decode);
    }
}

#[test]
fn message_count_is_bounded_before_resolution() {
    let limits = DecodeLimits {
        max_msgs: 3,
        ..DecodeLimits::default()
    };
    let d = TxDecoder::new(MsgRegistry::with_default_messages(), limits);
    // Unresolvable payloads: had they been resolved first the error would differ.
    let raw = raw_with_messages(
        (0..4)
            .map(|_| Any {
                type_url: "/unknown.Msg".into(),
                value: vec![],
            })
            .collect(),
    );
    assert!(matches!(d.decode(&raw), Err(TxError::LimitExceeded(_))));
}

#[test]
fn message_size_is_bounded_before_resolution() {
    let limits = DecodeLimits {
        max_msg_bytes: 16,
        ..DecodeLimits::default()
    };
    let d = TxDecoder::new(MsgRegistry::with_default_messages(), limits);
    let raw = raw_with_messages(vec![Any {
        type_url: "/unknown.Msg".into(),
        value: vec![0u8; 17],
    }]);
    assert!(matches!(d.decode(&raw), Err(TxError::LimitExceeded(_))));
}

#[test]
fn total_size_is_bounded() {
    let limits = DecodeLimits {
        max_tx_bytes: 32,
        ..DecodeLimits::default()
    };
    let d = TxDecoder::new(MsgRegistry::with_default_messages(), limits);
    assert!(matches!(
        d.decode(&signed_send(&kp(1))),
        Err(TxError::LimitExceeded(_))
    ));
}

#[test]
fn unknown_critical_body_field_rejects_but_non_critical_passes() {
    let signer = kp(1);
    let mut envelope = proto::TxRaw::decode(signed_send(&signer).as_slice()).unwrap();
    let original_body = envelope.body_bytes.clone();

    // field 1030 (non-critical), varint 1
    envelope.body_bytes.extend([0xb0, 0x40, 0x01]);
    assert!(decoder().decode(&envelope.encode_to_vec()).is_ok());

    // field 5 (critical), varint 1
    envelope.body_bytes = original_body;
    envelope.body_bytes.extend([0x28, 0x01]);
    let err = decoder().decode(&envelope.encode_to_vec()).unwrap_err();
    assert!(matches!(err, TxError::Decode(_)));
}

#[test]
fn unknown_envelope_field_rejects() {
    let mut raw = signed_send(&kp(1));
    raw.extend([0x20, 0x01]); // field 4, varint
    assert!(matches!(decoder().decode(&raw), Err(TxError::Decode(_))));
}

#[test]
fn unsupported_sign_mode_rejects() {
    let signer = kp(1);
    let mut envelope = proto::TxRaw::decode(signed_send(&signer).as_slice()).unwrap();
    let mut auth = proto::AuthInfo::decode(envelope.auth_info_bytes.as_slice()).unwrap();
    auth.signer_infos[0].mode_info = Some(proto::ModeInfo {
        sum: Some(proto::mode_info::Sum::Single(proto::mode_info::Single {
            mode: proto::SignMode::LegacyAminoJson as i32,
        })),
    });
    envelope.auth_info_bytes = auth.encode_to_vec();
    assert!(matches!(
        decoder().decode(&envelope.encode_to_vec()),
        Err(TxError::Decode(_))
    ));
}

#[test]
fn zero_threshold_multisig_key_is_rejected_on_the_wire() {
    let leaf = pubkey::public_key_to_any(&PublicKey::Ed25519(kp(1).public_key()));
    let any = Any {
        type_url: MULTISIG_PUBKEY_TYPE_URL.into(),
        value: proto::LegacyAminoPubKey {
            threshold: 0,
            public_keys: vec![leaf.clone(), leaf],
        }
        .encode_to_vec(),
    };
    let err = pubkey::public_key_from_any(&any, 4).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Authentication);
}

#[test]
fn multisig_transaction_round_trips() {
    let a = kp(1);
    let b = kp(2);
    let c = kp(3);
    let multi = MultisigPublicKey::new(
        2,
        [&a, &b, &c]
            .iter()
            .map(|k| PublicKey::Ed25519(k.public_key()))
            .collect(),
    )
    .unwrap();
    let signer = Signer::Multi {
        key: &multi,
        signers: vec![(2, &c), (0, &a)],
    };
    let from = signer.address();
    let msg = MsgSend::new(&from, &b.public_key_address(), &stake(1));
    let raw = TxBuilder::new()
        .message(&msg)
        .fee(&stake(1), 100_000)
        .sign(CHAIN, &[SignerEntry::new(signer, 7, 0)]);
    let tx = decoder().decode(&encode(&raw)).unwrap();
    let pk = tx.signer_infos[0].public_key(4).unwrap().unwrap();
    assert_eq!(pk.address(), from);
    let sig = tx.signature_data(0).unwrap();
    assert!(pk.verify(&tx.sign_bytes(CHAIN, 7), &sig).is_ok());
    assert_eq!(sig.leaf_count(), 2);
}

#[test]
fn fee_payer_is_appended_to_signers() {
    let a = kp(1);
    let payer = kp(2).public_key_address();
    let signer = Signer::Single(&a);
    let msg = MsgSend::new(&signer.address(), &payer, &stake(1));
    let raw = TxBuilder::new()
        .message(&msg)
        .fee(&stake(1), 100_000)
        .fee_payer(&payer)
        .sign(CHAIN, &[SignerEntry::new(signer, 0, 0)]);
    let tx = decoder().decode(&encode(&raw)).unwrap();
    assert_eq!(tx.signers().unwrap(), vec![a.public_key_address(), payer]);
    assert_eq!(tx.fee_payer().unwrap(), payer);
    assert_eq!(msg.type_url(), crate::msg::bank::MSG_SEND_TYPE_URL);
}

proptest! {
    #[test]
    fn decoder_never_panics_on_arbitrary_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = decoder().decode(&bytes);
    }

    #[test]
    fn decoder_never_panics_on_mutated_transactions(
        flips in proptest::collection::vec((any::<usize>(), any::<u8>()), 1..8)
    ) {
        let mut raw = signed_send(&kp(5));
        let len = raw.len();
        for (pos, byte) in flips {
            raw[pos % len] ^= byte;
        }
        if let Err(e) = decoder().decode(&raw) {
            prop_assert!(e.class().is_expected());
        }
    }
}
