// Path: crates/validator/src/ante/mod.rs
mod basic;
mod fee;
mod setup;
mod sigverify;

pub use basic::{TxTimeoutHeightDecorator, ValidateBasicDecorator, ValidateMemoDecorator, ValidateSigCountDecorator};
pub use fee::DeductFeeDecorator;
pub use setup::{ConsumeTxSizeGasDecorator, SetUpContextDecorator};
pub use sigverify::{
    IncrementSequenceDecorator, SetPubKeyDecorator, SigGasConsumeDecorator, SigVerificationDecorator,
};

use ante_api::transaction::{AnteContext, AnteDecorator, Next, StageCost};
use ante_tx::DecodedTx;
use ante_types::error::TxError;
use thiserror::Error;

/// A decorator list that violates the size-charge ordering rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnteChainError {
    /// No stage charges for transaction size.
    #[error("ante chain has no size-charge stage")]
    MissingSizeCharge,
    /// More than one stage charges for transaction size.
    #[error("ante chain charges for size twice (second at {0})")]
    DuplicateSizeCharge(&'static str),
    /// A structure-proportional stage runs before the size charge.
    #[error("stage {0} does structure-proportional work before the size charge")]
    StructuralBeforeSizeCharge(&'static str),
    /// A set-up stage runs after the size charge.
    #[error("set-up stage {0} runs after the size charge")]
    SetupAfterSizeCharge(&'static str),
}

/// An ordered, immutable list of ante decorators built once at start-up.
pub struct AnteChain {
    stages: Vec<Box<dyn AnteDecorator>>,
}

impl AnteChain {
    /// Builds a chain, enforcing that exactly one stage charges for size, that
    /// only set-up stages precede it and that every structural stage follows it.
    pub fn new(stages: Vec<Box<dyn AnteDecorator>>) -> Result<Self, AnteChainError> {
        let mut charged = false;
        for stage in &stages {
            match (stage.cost(), charged) {
                (StageCost::Setup, false) => {}
                (StageCost::Setup, true) => return Err(AnteChainError::SetupAfterSizeCharge(stage.name())),
                (StageCost::SizeCharge, false) => charged = true,
                (StageCost::SizeCharge, true) => return Err(AnteChainError::DuplicateSizeCharge(stage.name())),
                (StageCost::Structural, false) => {
                    return Err(AnteChainError::StructuralBeforeSizeCharge(stage.name()))
                }
                (StageCost::Structural, true) => {}
            }
        }
        if !charged {
            return Err(AnteChainError::MissingSizeCharge);
        }
        Ok(Self { stages })
    }

    /// Runs every stage in order.
    pub fn run(&self, ctx: &mut AnteContext<'_>, tx: &DecodedTx, simulate: bool) -> Result<(), TxError> {
        Next::new(&self.stages).run(ctx, tx, simulate)
    }

    /// Stage names in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true for a chain without stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// The decorators of [`default_ante_chain`], in order.
pub fn default_ante_stages() -> Vec<Box<dyn AnteDecorator>> {
    vec![
        Box::new(SetUpContextDecorator),
        Box::new(ConsumeTxSizeGasDecorator),
        Box::new(ValidateSigCountDecorator),
        Box::new(ValidateBasicDecorator),
        Box::new(TxTimeoutHeightDecorator),
        Box::new(ValidateMemoDecorator),
        Box::new(DeductFeeDecorator),
        Box::new(SetPubKeyDecorator),
        Box::new(SigGasConsumeDecorator),
        Box::new(SigVerificationDecorator),
        Box::new(IncrementSequenceDecorator),
    ]
}

/// The standard admission chain.
pub fn default_ante_chain() -> AnteChain {
    // The default list satisfies the ordering rule; a test asserts it.
    AnteChain {
        stages: default_ante_stages(),
    }
}

#[cfg(test)]
mod tests;
