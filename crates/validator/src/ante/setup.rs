// Path: crates/validator/src/ante/setup.rs
//! Stages that run before any structure-proportional work.

use ante_api::gas::GasMeter;
use ante_api::transaction::{AnteContext, AnteDecorator, Next, StageCost};
use ante_tx::DecodedTx;
use ante_types::error::TxError;

/// Bytes charged for each missing signature while simulating.
const SIMULATED_SIGNATURE_BYTES: u64 = 64;

/// Installs the gas meter for the attempt.
///
/// The meter takes the fee's gas limit, or no limit when simulating. A limit
/// above the configured block maximum rejects before anything is charged.
pub struct SetUpContextDecorator;

impl AnteDecorator for SetUpContextDecorator {
    fn name(&self) -> &'static str {
        "SetUpContext"
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
        let limit = tx.fee.gas_limit;
        let max = ctx.params.max_block_gas;
        if max != 0 && limit > max {
            return Err(TxError::GasLimitTooHigh { limit, max });
        }
        ctx.gas_meter = if simulate {
            GasMeter::infinite()
        } else {
            GasMeter::new(limit)
        };
        next.run(ctx, tx, simulate)
    }
}

/// Charges `tx_size_cost_per_byte` for every byte of the raw transaction.
pub struct ConsumeTxSizeGasDecorator;

impl AnteDecorator for ConsumeTxSizeGasDecorator {
    fn name(&self) -> &'static str {
        "ConsumeTxSizeGas"
    }

    fn cost(&self) -> StageCost {
        StageCost::SizeCharge
    }

    fn ante_handle(
        &self,
        ctx: &mut AnteContext<'_>,
        tx: &DecodedTx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), TxError> {
        let per_byte = ctx.params.tx_size_cost_per_byte;
        let mut bytes = tx.raw_len as u64;
        if simulate {
            // Placeholder signatures are empty; charge as if they were real.
            let missing = tx.signatures.iter().filter(|s| s.is_empty()).count() as u64;
            bytes = bytes.saturating_add(missing.saturating_mul(SIMULATED_SIGNATURE_BYTES));
        }
        ctx.gas_meter
            .consume(per_byte.saturating_mul(bytes), "txSize")?;
        next.run(ctx, tx, simulate)
    }
}
