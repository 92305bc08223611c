// Path: crates/validator/src/ante/fee.rs
//! Fee checks and deduction.

use ante_api::transaction::{AnteContext, AnteDecorator, Next};
use ante_tx::DecodedTx;
use ante_types::app::{Coins, Event, ExecMode};
use ante_types::config::MinGasPrice;
use ante_types::error::TxError;

/// Enforces local minimum gas prices and moves the fee to the fee collector.
///
/// When the fee names a granter other than the payer, the payer's allowance
/// from that granter is consumed first and the granter pays.
pub struct DeductFeeDecorator;

fn check_min_gas_prices(prices: &[MinGasPrice], fee: &Coins, gas_limit: u64) -> Result<(), TxError> {
    let required: Vec<(&str, u128)> = prices
        .iter()
        .map(|p| (p.denom.as_str(), p.required_fee(gas_limit)))
        .filter(|(_, amount)| *amount > 0)
        .collect();
    if required.is_empty() {
        return Ok(());
    }
    // Meeting the price in any one listed denomination is enough.
    if required
        .iter()
        .any(|(denom, amount)| fee.amount_of(denom) >= *amount)
    {
        return Ok(());
    }
    let required = required
        .iter()
        .map(|(denom, amount)| format!("{amount}{denom}"))
        .collect::<Vec<_>>()
        .join(",");
    Err(TxError::InsufficientFee {
        got: fee.to_string(),
        required,
    })
}

impl AnteDecorator for DeductFeeDecorator {
    fn name(&self) -> &'static str {
        "DeductFee"
    }

    fn ante_handle(
        &self,
        ctx: &mut AnteContext<'_>,
        tx: &DecodedTx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), TxError> {
        let fee = &tx.fee;
        if !simulate && fee.gas_limit == 0 {
            return Err(TxError::Validation("must provide positive gas".into()));
        }
        if ctx.mode == ExecMode::Check && !simulate {
            check_min_gas_prices(ctx.min_gas_prices, &fee.amount, fee.gas_limit)?;
        }

        let payer = tx.fee_payer()?;
        let accounts = ctx.accounts;
        let mut deduct_from = payer;
        if let Some(granter) = fee.granter {
            if granter != payer {
                let msgs = tx.msgs()?;
                accounts.consume_allowance(
                    &mut *ctx.state,
                    &granter,
                    &payer,
                    &fee.amount,
                    &msgs,
                    ctx.block_height,
                )?;
                deduct_from = granter;
            }
        }

        if accounts.get_account(&*ctx.state, &deduct_from)?.is_none() {
            return Err(TxError::UnknownAccount(format!(
                "fee payer address {deduct_from} does not exist"
            )));
        }
        if !fee.amount.is_zero() {
            accounts.deduct_fee(&mut *ctx.state, &deduct_from, &fee.amount)?;
        }

        ctx.emit(
            Event::new("tx")
                .attr("fee", &fee.amount)
                .attr("fee_payer", deduct_from),
        );
        next.run(ctx, tx, simulate)
    }
}
