// Path: crates/crypto/src/sign/tests/mod.rs

use super::*;
use crate::sign::batch::BatchVerifier;
use crate::sign::ed25519::Ed25519Keypair;
use curve25519_dalek::scalar::{clamp_integer, Scalar};
use parity_scale_codec::{Decode, Encode};
use proptest::prelude::*;
use sha2::{Digest, Sha512};

fn keypair(seed: u8) -> Ed25519Keypair {
    Ed25519Keypair::from_seed([seed; 32])
}

fn two_of_three() -> (Vec<Ed25519Keypair>, PublicKey) {
    let kps: Vec<_> = (1..=3).map(keypair).collect();
    let keys = kps
        .iter()
        .map(|kp| PublicKey::Ed25519(kp.public_key()))
        .collect();
    let multi = MultisigPublicKey::new(2, keys).unwrap();
    (kps, PublicKey::Multisig(multi))
}

fn multi_sig(kps: &[Ed25519Keypair], signers: &[usize], msg: &[u8]) -> SignatureData {
    let mut bitarray = CompactBitArray::new(kps.len());
    let mut signatures = Vec::new();
    for &i in signers {
        bitarray.set(i, true);
        signatures.push(SignatureData::Single(kps[i].sign(msg)));
    }
    SignatureData::Multi {
        bitarray,
        signatures,
    }
}

#[test]
fn single_key_round_trip() {
    let kp = keypair(9);
    let pk = PublicKey::Ed25519(kp.public_key());
    let sig = SignatureData::Single(kp.sign(b"hello"));
    assert!(pk.verify(b"hello", &sig).is_ok());
    assert_eq!(
        pk.verify(b"other", &sig),
        Err(CryptoError::VerificationFailed)
    );
    assert!(!kp.public_key().verify(b"hello", &[0u8; 10]));
}

#[test]
fn malformed_public_keys_are_rejected() {
    assert!(Ed25519PublicKey::from_slice(&[1u8; 31]).is_err());
    // The identity point has small order.
    let mut identity = [0u8; 32];
    identity[0] = 1;
    assert!(Ed25519PublicKey::from_slice(&identity).is_err());
}

#[test]
fn multisig_verifies_with_threshold_signers() {
    let (kps, pk) = two_of_three();
    let msg = b"sign doc";
    assert!(pk.verify(msg, &multi_sig(&kps, &[0, 2], msg)).is_ok());
    assert!(pk.verify(msg, &multi_sig(&kps, &[0, 1, 2], msg)).is_ok());
    assert!(matches!(
        pk.verify(msg, &multi_sig(&kps, &[1], msg)),
        Err(CryptoError::BelowThreshold { set_bits: 1, threshold: 2 })
    ));
}

#[test]
fn set_bits_must_match_signature_count_in_both_directions() {
    let (kps, pk) = two_of_three();
    let msg = b"m";

    // More signatures than set bits.
    let mut bitarray = CompactBitArray::new(3);
    bitarray.set(0, true);
    bitarray.set(1, true);
    let too_many = SignatureData::Multi {
        bitarray: bitarray.clone(),
        signatures: (0..3).map(|i| SignatureData::Single(kps[i].sign(msg))).collect(),
    };
    assert!(matches!(
        pk.verify(msg, &too_many),
        Err(CryptoError::SignatureCount { sigs: 3, set_bits: 2 })
    ));

    // Fewer signatures than set bits.
    let too_few = SignatureData::Multi {
        bitarray,
        signatures: vec![SignatureData::Single(kps[0].sign(msg))],
    };
    assert!(matches!(
        pk.verify(msg, &too_few),
        Err(CryptoError::SignatureCount { sigs: 1, set_bits: 2 })
    ));
}

#[test]
fn bitarray_length_must_equal_key_count() {
    let (kps, pk) = two_of_three();
    let mut bitarray = CompactBitArray::new(8);
    bitarray.set(0, true);
    bitarray.set(1, true);
    let sig = SignatureData::Multi {
        bitarray,
        signatures: vec![
            SignatureData::Single(kps[0].sign(b"m")),
            SignatureData::Single(kps[1].sign(b"m")),
        ],
    };
    assert!(matches!(
        pk.verify(b"m", &sig),
        Err(CryptoError::BitArrayLength { bits: 8, keys: 3 })
    ));
}

#[test]
fn shape_mismatch_is_structural_error() {
    let (kps, pk) = two_of_three();
    let single = SignatureData::Single(kps[0].sign(b"m"));
    assert!(matches!(pk.verify(b"m", &single), Err(CryptoError::Mismatch(_))));
}

#[test]
fn scale_decoding_enforces_threshold() {
    let kp = keypair(1);
    let leaf = PublicKey::Ed25519(kp.public_key());
    // Hand-encode a multisig with threshold 0: variant 1, threshold, keys.
    let mut bytes = vec![1u8];
    bytes.extend(0u32.encode());
    bytes.extend(vec![leaf.clone()].encode());
    assert!(PublicKey::decode(&mut &bytes[..]).is_err());

    let good = PublicKey::Multisig(MultisigPublicKey::new(1, vec![leaf]).unwrap());
    let decoded = PublicKey::decode(&mut &good.encode()[..]).unwrap();
    assert_eq!(decoded, good);
}

#[test]
fn nested_multisig_counts_and_gas() {
    let (kps, inner) = two_of_three();
    let outer_kp = keypair(7);
    let outer = PublicKey::Multisig(
        MultisigPublicKey::new(2, vec![inner, PublicKey::Ed25519(outer_kp.public_key())]).unwrap(),
    );
    assert_eq!(outer.key_count(), 4);
    assert_eq!(outer.depth(), 3);

    let msg = b"nested";
    let mut bitarray = CompactBitArray::new(2);
    bitarray.set(0, true);
    bitarray.set(1, true);
    let sig = SignatureData::Multi {
        bitarray,
        signatures: vec![
            multi_sig(&kps, &[0, 1], msg),
            SignatureData::Single(outer_kp.sign(msg)),
        ],
    };
    assert!(outer.verify(msg, &sig).is_ok());
    assert_eq!(sig.leaf_count(), 3);
    assert_eq!(outer.verification_gas(&sig, 100).unwrap(), 300);
    assert_eq!(outer.leaf_signatures(&sig).unwrap().len(), 3);
}

#[test]
fn bitarray_rejects_bad_encodings() {
    assert!(CompactBitArray::from_raw(8, vec![0]).is_err());
    assert!(CompactBitArray::from_raw(3, vec![]).is_err());
    // Three logical bits, but the fourth bit is set.
    assert!(CompactBitArray::from_raw(3, vec![0b0001_0000]).is_err());
    let ok = CompactBitArray::from_raw(3, vec![0b1010_0000]).unwrap();
    assert_eq!(ok.len(), 3);
    assert_eq!(ok.count_ones(), 2);
    assert!(ok.get(0) && !ok.get(1) && ok.get(2));
    assert!(!ok.get(3));
}

#[test]
fn bitarray_set_out_of_range_is_noop() {
    let mut arr = CompactBitArray::new(3);
    assert!(!arr.set(3, true));
    assert_eq!(arr.count_ones(), 0);
    assert_eq!(CompactBitArray::new(16).len(), 16);
    assert!(CompactBitArray::new(0).is_empty());
}

#[test]
fn batch_reports_exact_per_slot_results() {
    let a = keypair(1);
    let b = keypair(2);
    let mut batch = BatchVerifier::new();
    batch.add(&a.public_key(), b"one", &a.sign(b"one")).unwrap();
    batch.add(&b.public_key(), b"two", &a.sign(b"two")).unwrap();
    batch.add(&b.public_key(), b"three", &b.sign(b"three")).unwrap();
    let (all, per_slot) = batch.verify();
    assert!(!all);
    assert_eq!(per_slot, vec![true, false, true]);
}

#[test]
fn batch_all_valid_and_empty() {
    assert_eq!(BatchVerifier::new().verify(), (true, vec![]));
    let a = keypair(3);
    let mut batch = BatchVerifier::new();
    for i in 0..4u8 {
        batch.add(&a.public_key(), &[i], &a.sign(&[i])).unwrap();
    }
    assert_eq!(batch.verify(), (true, vec![true; 4]));
}

#[test]
fn batch_add_rejects_malformed_signature_without_queueing() {
    let a = keypair(4);
    let mut batch = BatchVerifier::new();
    assert!(batch.add(&a.public_key(), b"m", &[0u8; 12]).is_err());
    assert!(batch.is_empty());
}

/// A signature by `seed` whose R is the identity point. It satisfies the
/// unchecked verification equation, so only the R checks can catch it.
fn identity_commitment_signature(seed: [u8; 32], msg: &[u8]) -> Vec<u8> {
    let expanded = Sha512::digest(seed);
    let mut lower = [0u8; 32];
    lower.copy_from_slice(&expanded[..32]);
    let secret = Scalar::from_bytes_mod_order(clamp_integer(lower));

    let mut r = [0u8; 32];
    r[0] = 1;
    let public = Ed25519Keypair::from_seed(seed).public_key();
    let digest = Sha512::new()
        .chain_update(r)
        .chain_update(public.as_bytes())
        .chain_update(msg)
        .finalize();
    let mut wide = [0u8; 64];
    wide.copy_from_slice(&digest);
    let s = Scalar::from_bytes_mod_order_wide(&wide) * secret;
    [r, s.to_bytes()].concat()
}

#[test]
fn small_order_commitment_is_refused_by_both_paths() {
    let kp = keypair(1);
    let sig = identity_commitment_signature([1; 32], b"doc");
    assert!(!kp.public_key().verify(b"doc", &sig));

    let mut batch = BatchVerifier::new();
    assert!(matches!(
        batch.add(&kp.public_key(), b"doc", &sig),
        Err(CryptoError::InvalidSignature(_))
    ));
    assert!(batch.is_empty());

    // A non-canonical encoding of the identity (y = p + 1) is refused too.
    let mut non_canonical = sig.clone();
    non_canonical[0] = 0xee;
    non_canonical[1..31].fill(0xff);
    non_canonical[31] = 0x7f;
    assert!(!kp.public_key().verify(b"doc", &non_canonical));
    assert!(batch.add(&kp.public_key(), b"doc", &non_canonical).is_err());
}

#[derive(Clone, Debug)]
enum Slot {
    Honest(u8),
    WrongMessage(u8),
    IdentityCommitment(u8),
}

fn slot() -> impl Strategy<Value = Slot> {
    prop_oneof![
        (1u8..5).prop_map(Slot::Honest),
        (1u8..5).prop_map(Slot::WrongMessage),
        (1u8..5).prop_map(Slot::IdentityCommitment),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn batch_accepts_exactly_what_single_verification_accepts(slots in prop::collection::vec(slot(), 0..6)) {
        let mut batch = BatchVerifier::new();
        let mut queued = Vec::new();
        for (i, slot) in slots.iter().enumerate() {
            let msg = [i as u8; 8];
            let (seed, sig) = match *slot {
                Slot::Honest(seed) => (seed, keypair(seed).sign(&msg)),
                Slot::WrongMessage(seed) => (seed, keypair(seed).sign(b"elsewhere")),
                Slot::IdentityCommitment(seed) => (seed, identity_commitment_signature([seed; 32], &msg)),
            };
            let key = keypair(seed).public_key();
            let single = key.verify(&msg, &sig);
            match batch.add(&key, &msg, &sig) {
                Ok(()) => queued.push(single),
                Err(_) => prop_assert!(!single),
            }
        }
        let all_queued_valid = queued.iter().all(|ok| *ok);
        let (all, per_slot) = batch.verify();
        prop_assert_eq!(per_slot, queued);
        prop_assert_eq!(all, all_queued_valid);
    }
}
