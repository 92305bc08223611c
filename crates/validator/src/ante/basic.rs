// Path: crates/validator/src/ante/basic.rs
//! Stateless checks on the transaction's shape.

use ante_api::transaction::{AnteContext, AnteDecorator, Next};
use ante_tx::decoder::MAX_GAS_WANTED;
use ante_tx::{DecodedTx, SdkMsg};
use ante_types::error::TxError;

/// Checks signature counts before any key material is touched.
///
/// The signature and signer-info counts are compared first, in constant time.
/// Only then are the supplied public keys parsed, and their expanded key count
/// is held to `tx_sig_limit`.
pub struct ValidateSigCountDecorator;

impl AnteDecorator for ValidateSigCountDecorator {
    fn name(&self) -> &'static str {
        "ValidateSigCount"
    }

    fn ante_handle(
        &self,
        ctx: &mut AnteContext<'_>,
        tx: &DecodedTx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), TxError> {
        if tx.signer_infos.is_empty() {
            return Err(TxError::Unauthorized("no signatures supplied".into()));
        }
        if tx.signatures.len() != tx.signer_infos.len() {
            return Err(TxError::Unauthorized(format!(
                "wrong number of signatures; expected {}, got {}",
                tx.signer_infos.len(),
                tx.signatures.len()
            )));
        }

        let limit = ctx.params.tx_sig_limit;
        let mut count = 0usize;
        for key in ctx.supplied_keys(tx)?.iter().flatten() {
            count = count.saturating_add(key.key_count());
            if count > limit as usize {
                return Err(TxError::TooManySignatures {
                    got: count as u64,
                    limit,
                });
            }
        }
        next.run(ctx, tx, simulate)
    }
}

/// Runs every message's `validate_basic` and checks the fee and signers.
pub struct ValidateBasicDecorator;

impl AnteDecorator for ValidateBasicDecorator {
    fn name(&self) -> &'static str {
        "ValidateBasic"
    }

    fn ante_handle(
        &self,
        ctx: &mut AnteContext<'_>,
        tx: &DecodedTx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), TxError> {
        let msgs = tx.msgs()?;
        if msgs.is_empty() {
            return Err(TxError::Validation("must contain at least one message".into()));
        }
        for msg in &msgs {
            msg.validate_basic()?;
        }

        if tx.fee.gas_limit > MAX_GAS_WANTED {
            return Err(TxError::GasLimitTooHigh {
                limit: tx.fee.gas_limit,
                max: MAX_GAS_WANTED,
            });
        }
        tx.fee.amount.validate()?;

        let signers = tx.signers()?;
        if signers.len() != tx.signer_infos.len() {
            return Err(TxError::Unauthorized(format!(
                "wrong number of signers; expected {}, got {}",
                signers.len(),
                tx.signer_infos.len()
            )));
        }
        next.run(ctx, tx, simulate)
    }
}

/// Rejects a transaction whose timeout height has passed.
pub struct TxTimeoutHeightDecorator;

impl AnteDecorator for TxTimeoutHeightDecorator {
    fn name(&self) -> &'static str {
        "TxTimeoutHeight"
    }

    fn ante_handle(
        &self,
        ctx: &mut AnteContext<'_>,
        tx: &DecodedTx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), TxError> {
        if tx.timeout_height != 0 && ctx.block_height > tx.timeout_height {
            return Err(TxError::TimeoutHeight {
                timeout: tx.timeout_height,
                current: ctx.block_height,
            });
        }
        next.run(ctx, tx, simulate)
    }
}

/// Holds the memo to `max_memo_characters` characters.
pub struct ValidateMemoDecorator;

impl AnteDecorator for ValidateMemoDecorator {
    fn name(&self) -> &'static str {
        "ValidateMemo"
    }

    fn ante_handle(
        &self,
        ctx: &mut AnteContext<'_>,
        tx: &DecodedTx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), TxError> {
        let max = ctx.params.max_memo_characters;
        let got = tx.memo.chars().count() as u64;
        if got > max {
            return Err(TxError::MemoTooLarge { max, got });
        }
        next.run(ctx, tx, simulate)
    }
}
