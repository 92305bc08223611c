// Path: crates/types/src/keys/mod.rs
//! Defines constants for well-known state keys.

use crate::app::Address;

/// The state key prefix for account records (number, sequence, public key).
pub const ACCOUNT_KEY_PREFIX: &[u8] = b"auth::account::";
/// The state key for the next account number to hand out.
pub const NEXT_ACCOUNT_NUMBER_KEY: &[u8] = b"auth::next_account_number";
/// The state key prefix for balances, keyed by `address || "::" || denom`.
pub const BALANCE_KEY_PREFIX: &[u8] = b"bank::balance::";
/// The state key prefix for fee allowances, keyed by `granter || grantee`.
pub const FEE_ALLOWANCE_PREFIX: &[u8] = b"feegrant::allowance::";
/// The state key prefix for authz grants, keyed by `granter || grantee || type_url`.
pub const AUTHZ_GRANT_PREFIX: &[u8] = b"authz::grant::";

/// Module account name receiving all deducted fees.
pub const FEE_COLLECTOR_NAME: &str = "fee_collector";

/// Returns the state key for an account record.
pub fn account_key(address: &Address) -> Vec<u8> {
    [ACCOUNT_KEY_PREFIX, address.as_bytes()].concat()
}

/// Returns the prefix under which all balances of an address are stored.
pub fn balance_prefix(address: &Address) -> Vec<u8> {
    [BALANCE_KEY_PREFIX, address.as_bytes(), b"::"].concat()
}

/// Returns the state key for a single balance entry.
pub fn balance_key(address: &Address, denom: &str) -> Vec<u8> {
    [balance_prefix(address).as_slice(), denom.as_bytes()].concat()
}

/// Returns the state key for a fee allowance granted by `granter` to `grantee`.
pub fn fee_allowance_key(granter: &Address, grantee: &Address) -> Vec<u8> {
    [FEE_ALLOWANCE_PREFIX, granter.as_bytes(), grantee.as_bytes()].concat()
}

/// Returns the state key for an authz grant of `type_url` from `granter` to `grantee`.
pub fn authz_grant_key(granter: &Address, grantee: &Address, type_url: &str) -> Vec<u8> {
    [
        AUTHZ_GRANT_PREFIX,
        granter.as_bytes(),
        grantee.as_bytes(),
        type_url.as_bytes(),
    ]
    .concat()
}
