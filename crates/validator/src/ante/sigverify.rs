// Path: crates/validator/src/ante/sigverify.rs
//! Public key binding, signature gas, signature verification and sequences.

use ante_api::keeper::BaseAccount;
use ante_api::transaction::{AnteContext, AnteDecorator, DeferredSignature, Next, SigVerifyMode};
use ante_crypto::PublicKey;
use ante_tx::DecodedTx;
use ante_types::app::{Address, Event};
use ante_types::error::TxError;

fn load_account(ctx: &AnteContext<'_>, signer: &Address) -> Result<BaseAccount, TxError> {
    ctx.accounts
        .get_account(&*ctx.state, signer)?
        .ok_or_else(|| TxError::UnknownAccount(signer.to_string()))
}

fn bound_key(account: &BaseAccount) -> Result<&PublicKey, TxError> {
    account
        .pub_key
        .as_ref()
        .ok_or_else(|| TxError::Unauthorized(format!("pubkey on account {} is not set", account.address)))
}

fn signer_sequence(tx: &DecodedTx, index: usize) -> Result<u64, TxError> {
    tx.signer_infos
        .get(index)
        .map(|info| info.sequence)
        .ok_or_else(|| TxError::Unauthorized(format!("no signer info at {index}")))
}

/// Binds supplied public keys to signer accounts that have none yet.
///
/// A supplied key must derive the signer's address.
pub struct SetPubKeyDecorator;

impl AnteDecorator for SetPubKeyDecorator {
    fn name(&self) -> &'static str {
        "SetPubKey"
    }

    fn ante_handle(
        &self,
        ctx: &mut AnteContext<'_>,
        tx: &DecodedTx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), TxError> {
        let signers = tx.signers()?;
        let keys = ctx.supplied_keys(tx)?.to_vec();

        for (index, (signer, key)) in signers.iter().zip(keys).enumerate() {
            let mut account = load_account(ctx, signer)?;
            ctx.emit(Event::new("tx").attr("acc_seq", format!("{signer}/{}", signer_sequence(tx, index)?)));

            let Some(key) = key else { continue };
            if key.address() != *signer {
                return Err(TxError::Unauthorized(format!(
                    "pubKey does not match signer address {signer} with signer index: {index}"
                )));
            }
            if account.pub_key.is_some() {
                continue;
            }
            account.pub_key = Some(key);
            ctx.accounts.set_account(&mut *ctx.state, &account)?;
        }
        next.run(ctx, tx, simulate)
    }
}

/// Charges verification gas for every signature.
///
/// A multisig signature costs one `sig_verify_cost_ed25519` per leaf key that
/// actually signed, walked over the key's validated structure.
pub struct SigGasConsumeDecorator;

impl AnteDecorator for SigGasConsumeDecorator {
    fn name(&self) -> &'static str {
        "SigGasConsume"
    }

    fn ante_handle(
        &self,
        ctx: &mut AnteContext<'_>,
        tx: &DecodedTx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), TxError> {
        let cost = ctx.params.sig_verify_cost_ed25519;
        for (index, signer) in tx.signers()?.iter().enumerate() {
            let account = load_account(ctx, signer)?;
            let key = bound_key(&account)?;
            let placeholder = tx.signatures.get(index).is_some_and(|s| s.is_empty());

            let gas = if simulate && placeholder {
                // Nothing to walk; assume every constituent signs.
                cost.saturating_mul(key.key_count() as u64)
            } else {
                let sig = tx.signature_data(index)?;
                key.verification_gas(&sig, cost)?
            };
            ctx.gas_meter.consume(gas, verify_gas_label(key))?;
        }
        next.run(ctx, tx, simulate)
    }
}

fn verify_gas_label(key: &PublicKey) -> &'static str {
    match key {
        PublicKey::Ed25519(_) => "ante verify: ed25519",
        PublicKey::Multisig(_) => "ante verify: multisig",
    }
}

/// Checks sequences and verifies every signature against the bound keys.
///
/// In deferred mode the structural multisig checks still run here; the leaf
/// signatures are recorded on the context for a batch verifier. Simulation
/// skips the cryptographic check but not the sequence check.
pub struct SigVerificationDecorator;

impl AnteDecorator for SigVerificationDecorator {
    fn name(&self) -> &'static str {
        "SigVerification"
    }

    fn ante_handle(
        &self,
        ctx: &mut AnteContext<'_>,
        tx: &DecodedTx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), TxError> {
        for (index, signer) in tx.signers()?.iter().enumerate() {
            let account = load_account(ctx, signer)?;
            let key = bound_key(&account)?;

            let got = signer_sequence(tx, index)?;
            if got != account.sequence {
                return Err(TxError::WrongSequence {
                    expected: account.sequence,
                    got,
                });
            }
            if simulate {
                continue;
            }

            let sig = tx.signature_data(index)?;
            let sign_bytes = tx.sign_bytes(ctx.chain_id, account.account_number);
            match ctx.sig_verify {
                SigVerifyMode::Immediate => key.verify(&sign_bytes, &sig).map_err(|e| {
                    TxError::Unauthorized(format!(
                        "signature verification failed; please verify account number ({}), sequence ({}) and chain-id ({}): {e}",
                        account.account_number, account.sequence, ctx.chain_id
                    ))
                })?,
                SigVerifyMode::Deferred => {
                    for (leaf, bytes) in key.leaf_signatures(&sig)? {
                        ctx.deferred_signatures.push(DeferredSignature {
                            public_key: *leaf,
                            message: sign_bytes.clone(),
                            signature: bytes.to_vec(),
                        });
                    }
                }
            }
        }
        next.run(ctx, tx, simulate)
    }
}

/// Bumps every signer's sequence.
pub struct IncrementSequenceDecorator;

impl AnteDecorator for IncrementSequenceDecorator {
    fn name(&self) -> &'static str {
        "IncrementSequence"
    }

    fn ante_handle(
        &self,
        ctx: &mut AnteContext<'_>,
        tx: &DecodedTx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), TxError> {
        for signer in tx.signers()? {
            let mut account = load_account(ctx, &signer)?;
            account.sequence = account
                .sequence
                .checked_add(1)
                .ok_or_else(|| TxError::Internal(format!("sequence overflow for {signer}")))?;
            ctx.accounts.set_account(&mut *ctx.state, &account)?;
        }
        next.run(ctx, tx, simulate)
    }
}
