// Path: crates/services/src/tests/mod.rs

use crate::{AccountKeeper, AuthzKeeper, BankKeeper, FeeGrantKeeper, GenesisAccount, GenesisState, MsgRouter};
use ante_api::state::{StateAccess, StateOverlay};
use ante_crypto::{Ed25519Keypair, PublicKey};
use ante_state::CommittedStore;
use ante_tx::msg::authz::MSG_EXEC_TYPE_URL;
use ante_tx::msg::bank::MSG_SEND_TYPE_URL;
use ante_tx::msg::{
    AllowedMsgAllowance, Authorization, BasicAllowance, FeeAllowance, Grant, MsgExec, MsgGrant, MsgGrantAllowance,
    MsgSend,
};
use ante_tx::Msg;
use ante_types::app::{Address, Coin, Coins};
use ante_types::error::TxError;

fn stake(n: u128) -> Coins {
    Coins::from(Coin::new("stake", n))
}

fn addr(n: u8) -> Address {
    Address::new([n; 20])
}

fn bank() -> BankKeeper {
    BankKeeper::new("fee_collector")
}

fn funded(accounts: &[(Address, u128)]) -> CommittedStore {
    let mut store = CommittedStore::in_memory(64);
    let genesis = GenesisState {
        accounts: accounts
            .iter()
            .map(|(address, amount)| GenesisAccount {
                address: *address,
                balances: stake(*amount),
                pub_key: None,
                sequence: 0,
            })
            .collect(),
    };
    genesis.apply(&mut store, &bank()).unwrap();
    store
}

fn send(from: Address, to: Address, n: u128) -> Msg {
    Msg::Send(MsgSend::new(&from, &to, &stake(n)))
}

#[test]
fn genesis_assigns_account_numbers_and_balances() {
    let store = funded(&[(addr(1), 100), (addr(2), 5)]);
    let keeper = AccountKeeper;
    assert_eq!(keeper.get(&store, &addr(1)).unwrap().unwrap().account_number, 0);
    assert_eq!(keeper.get(&store, &addr(2)).unwrap().unwrap().account_number, 1);
    assert_eq!(bank().balances(&store, &addr(1)).unwrap(), stake(100));
}

#[test]
fn genesis_parses_json_and_binds_matching_keys() {
    let key = Ed25519Keypair::from_seed([4; 32]).public_key();
    let owner = PublicKey::Ed25519(key).address();
    let json = format!(
        r#"{{"accounts":[{{"address":"{owner}","balances":[{{"denom":"stake","amount":"7"}}],"pub_key":"{}"}}]}}"#,
        hex::encode(key.as_bytes())
    );
    let genesis = GenesisState::from_json(&json).unwrap();
    let mut store = CommittedStore::in_memory(8);
    genesis.apply(&mut store, &bank()).unwrap();
    assert_eq!(
        AccountKeeper.get(&store, &owner).unwrap().unwrap().pub_key,
        Some(PublicKey::Ed25519(key))
    );

    // The same key under another address is refused.
    let mut wrong = genesis.clone();
    wrong.accounts[0].address = addr(9);
    let mut store = CommittedStore::in_memory(8);
    assert!(wrong.apply(&mut store, &bank()).is_err());
}

#[test]
fn send_moves_funds_and_creates_recipient() {
    let mut store = funded(&[(addr(1), 100)]);
    bank().send(&mut store, &addr(1), &addr(2), &stake(40)).unwrap();
    assert_eq!(bank().balance(&store, &addr(1), "stake").unwrap(), 60);
    assert_eq!(bank().balance(&store, &addr(2), "stake").unwrap(), 40);
    assert!(AccountKeeper.get(&store, &addr(2)).unwrap().is_some());
}

#[test]
fn insufficient_funds_writes_nothing() {
    let store = funded(&[(addr(1), 10)]);
    let mut overlay = StateOverlay::new(&store);
    let two_denoms = Coins::new(vec![Coin::new("atom", 1), Coin::new("stake", 5)]).unwrap();
    let err = bank().send(&mut overlay, &addr(1), &addr(2), &two_denoms).unwrap_err();
    assert!(matches!(err, TxError::InsufficientFunds(_)));
    assert!(overlay.is_empty());
}

#[test]
fn fees_go_to_the_collector() {
    let mut store = funded(&[(addr(1), 100)]);
    let bank = bank();
    bank.deduct_fee(&mut store, &addr(1), &stake(30)).unwrap();
    assert_eq!(bank.balance(&store, &bank.fee_collector(), "stake").unwrap(), 30);

    let err = bank.deduct_fee(&mut store, &addr(1), &stake(71)).unwrap_err();
    assert!(matches!(err, TxError::InsufficientFunds(_)));
    let err = bank.deduct_fee(&mut store, &addr(8), &stake(1)).unwrap_err();
    assert!(matches!(err, TxError::UnknownAccount(_)));
}

#[test]
fn basic_allowance_is_consumed_and_deleted_when_spent() {
    let mut store = funded(&[(addr(1), 100), (addr(2), 0)]);
    let grants = FeeGrantKeeper;
    let allowance = FeeAllowance::Basic(BasicAllowance {
        spend_limit: stake(10),
        expiration_height: 0,
    });
    grants.grant(&mut store, &addr(1), &addr(2), &allowance).unwrap();
    assert!(grants.grant(&mut store, &addr(1), &addr(2), &allowance).is_err());

    let msg = send(addr(2), addr(3), 1);
    grants.use_grant(&mut store, &addr(1), &addr(2), &stake(6), &[&msg], 1).unwrap();
    assert!(matches!(
        grants.use_grant(&mut store, &addr(1), &addr(2), &stake(6), &[&msg], 1),
        Err(TxError::FeeAllowance(_))
    ));
    grants.use_grant(&mut store, &addr(1), &addr(2), &stake(4), &[&msg], 1).unwrap();
    assert!(grants.get(&store, &addr(1), &addr(2)).unwrap().is_none());
}

#[test]
fn expired_allowance_is_refused() {
    let mut store = funded(&[(addr(1), 100)]);
    let allowance = FeeAllowance::Basic(BasicAllowance {
        spend_limit: Coins::empty(),
        expiration_height: 5,
    });
    FeeGrantKeeper.grant(&mut store, &addr(1), &addr(2), &allowance).unwrap();
    let msg = send(addr(2), addr(3), 1);
    FeeGrantKeeper
        .use_grant(&mut store, &addr(1), &addr(2), &stake(1), &[&msg], 5)
        .unwrap();
    assert!(FeeGrantKeeper
        .use_grant(&mut store, &addr(1), &addr(2), &stake(1), &[&msg], 6)
        .is_err());
}

#[test]
fn allowed_msg_allowance_checks_nested_messages() {
    let mut store = funded(&[(addr(1), 100)]);
    let allowance = FeeAllowance::AllowedMsg(AllowedMsgAllowance {
        allowance: BasicAllowance {
            spend_limit: Coins::empty(),
            expiration_height: 0,
        },
        allowed_messages: vec![MSG_EXEC_TYPE_URL.to_string()],
    });
    FeeGrantKeeper.grant(&mut store, &addr(1), &addr(2), &allowance).unwrap();

    // The wrapper type is allowed but the nested send is not.
    let exec = Msg::Exec(MsgExec::new(&addr(2), vec![send(addr(4), addr(5), 1)]));
    let err = FeeGrantKeeper
        .use_grant(&mut store, &addr(1), &addr(2), &stake(1), &[&exec], 1)
        .unwrap_err();
    assert!(matches!(err, TxError::FeeAllowance(ref r) if r.contains(MSG_SEND_TYPE_URL)));
}

#[test]
fn exec_requires_a_grant_for_foreign_signers() {
    let store = funded(&[(addr(1), 100), (addr(2), 0)]);
    let router = MsgRouter::new(bank());
    let exec = Msg::Exec(MsgExec::new(&addr(2), vec![send(addr(1), addr(3), 10)]));

    let mut overlay = StateOverlay::new(&store);
    let err = router.execute(&mut overlay, &[&exec], 1).unwrap_err();
    assert!(matches!(err, TxError::Unauthorized(_)));

    let grant = Msg::Grant(MsgGrant {
        granter: addr(1).to_string(),
        grantee: addr(2).to_string(),
        grant: Grant {
            authorization: Authorization::Generic {
                msg: MSG_SEND_TYPE_URL.to_string(),
            },
            expiration_height: 10,
        },
    });
    let mut overlay = StateOverlay::new(&store);
    let events = router.execute(&mut overlay, &[&grant, &exec], 1).unwrap();
    assert!(events.iter().any(|e| e.kind == "exec"));
    assert!(events.iter().any(|e| e.kind == "transfer" && e.get("amount") == Some("10stake")));
    assert_eq!(bank().balance(&overlay, &addr(3), "stake").unwrap(), 10);

    // Past its expiration the grant no longer covers the send.
    let mut later = StateOverlay::new(&overlay);
    assert!(router.execute(&mut later, &[&exec], 11).is_err());
}

#[test]
fn exec_of_own_messages_needs_no_grant() {
    let store = funded(&[(addr(2), 50)]);
    let exec = Msg::Exec(MsgExec::new(&addr(2), vec![send(addr(2), addr(3), 5)]));
    let mut overlay = StateOverlay::new(&store);
    MsgRouter::new(bank()).execute(&mut overlay, &[&exec], 1).unwrap();
    assert_eq!(bank().balance(&overlay, &addr(2), "stake").unwrap(), 45);
}

#[test]
fn router_grants_and_revokes_allowances() {
    let store = funded(&[(addr(1), 50)]);
    let router = MsgRouter::new(bank());
    let grant = Msg::GrantAllowance(MsgGrantAllowance {
        granter: addr(1).to_string(),
        grantee: addr(2).to_string(),
        allowance: FeeAllowance::Basic(BasicAllowance {
            spend_limit: stake(5),
            expiration_height: 0,
        }),
    });
    let revoke = Msg::RevokeAllowance(ante_tx::msg::MsgRevokeAllowance {
        granter: addr(1).to_string(),
        grantee: addr(2).to_string(),
    });

    let mut overlay = StateOverlay::new(&store);
    let events = router.execute(&mut overlay, &[&grant], 1).unwrap();
    assert_eq!(events[0].get("action"), Some(ante_tx::msg::feegrant::MSG_GRANT_ALLOWANCE_TYPE_URL));
    assert!(FeeGrantKeeper.get(&overlay, &addr(1), &addr(2)).unwrap().is_some());

    router.execute(&mut overlay, &[&revoke], 1).unwrap();
    assert!(FeeGrantKeeper.get(&overlay, &addr(1), &addr(2)).unwrap().is_none());
    assert!(router.execute(&mut overlay, &[&revoke], 1).is_err());
}

#[test]
fn authz_grant_in_the_past_is_refused() {
    let mut store = funded(&[]);
    let grant = Grant {
        authorization: Authorization::Generic {
            msg: MSG_SEND_TYPE_URL.to_string(),
        },
        expiration_height: 3,
    };
    assert!(AuthzKeeper.save_grant(&mut store, &addr(1), &addr(2), &grant, 4).is_err());
    AuthzKeeper.save_grant(&mut store, &addr(1), &addr(2), &grant, 3).unwrap();
    assert!(store.get(&ante_types::keys::authz_grant_key(&addr(1), &addr(2), MSG_SEND_TYPE_URL)).unwrap().is_some());
}
