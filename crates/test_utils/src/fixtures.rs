// Path: crates/test_utils/src/fixtures.rs
//! Deterministic keys and addresses.

use ante_crypto::{CryptoError, Ed25519Keypair, MultisigPublicKey, PublicKey};
use ante_types::app::{Address, Coin, Coins};
use curve25519_dalek::scalar::{clamp_integer, Scalar};
use sha2::{Digest, Sha512};

/// The chain id every fixture signs for.
pub const CHAIN_ID: &str = "ante-test";

/// The fee and balance denomination used by the fixtures.
pub const DENOM: &str = "stake";

/// An ed25519 keypair whose secret is `seed` repeated.
pub fn keypair(seed: u8) -> Ed25519Keypair {
    Ed25519Keypair::from_seed([seed; 32])
}

/// The account address controlled by `key`.
pub fn address_of(key: &Ed25519Keypair) -> Address {
    PublicKey::Ed25519(key.public_key()).address()
}

/// A multisig over `keys` in the given order.
pub fn multisig(threshold: u32, keys: &[&Ed25519Keypair]) -> Result<MultisigPublicKey, CryptoError> {
    let keys = keys
        .iter()
        .map(|k| PublicKey::Ed25519(k.public_key()))
        .collect();
    MultisigPublicKey::new(threshold, keys)
}

/// The account address controlled by a multisig key.
pub fn multisig_address(key: &MultisigPublicKey) -> Address {
    PublicKey::Multisig(key.clone()).address()
}

/// `amount` of [`DENOM`].
pub fn stake(amount: u128) -> Coins {
    Coins::from(Coin::new(DENOM, amount))
}

/// A signature by [`keypair`]`(seed)` over `msg` whose R is the identity
/// point. It satisfies the unchecked ed25519 equation `[s]B = R + [k]A`, so
/// only a verifier that rejects small-order R refuses it.
pub fn identity_commitment_signature(seed: u8, msg: &[u8]) -> Vec<u8> {
    let expanded = Sha512::digest([seed; 32]);
    let mut lower = [0u8; 32];
    for (dst, src) in lower.iter_mut().zip(expanded.iter()) {
        *dst = *src;
    }
    let secret = Scalar::from_bytes_mod_order(clamp_integer(lower));

    let mut r = [0u8; 32];
    r[0] = 1;
    let digest = Sha512::new()
        .chain_update(r)
        .chain_update(keypair(seed).public_key().as_bytes())
        .chain_update(msg)
        .finalize();
    let mut wide = [0u8; 64];
    wide.copy_from_slice(&digest);
    let s = Scalar::from_bytes_mod_order_wide(&wide) * secret;
    [r, s.to_bytes()].concat()
}
