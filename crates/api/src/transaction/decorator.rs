// Path: crates/api/src/transaction/decorator.rs
//! Defines the trait for transaction pre-processing handlers (Ante Handlers).

use crate::transaction::context::AnteContext;
use ante_tx::DecodedTx;
use ante_types::error::TxError;

/// Where a decorator's work sits relative to the size charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageCost {
    /// Constant work that prepares the context; runs before the size charge.
    Setup,
    /// The size charge itself.
    SizeCharge,
    /// Work that scales with the transaction's internal structure; must run
    /// after the size charge.
    Structural,
}

/// A stage that performs pre-execution validation and state changes.
///
/// Decorators are run in a defined order before message execution. Each one
/// inspects or mutates the context and then either short-circuits with an
/// error or hands over to the rest of the chain through `next`.
pub trait AnteDecorator: Send + Sync {
    /// A stable name for logs and ordering checks.
    fn name(&self) -> &'static str;

    /// Where this stage sits relative to the size charge.
    fn cost(&self) -> StageCost {
        StageCost::Structural
    }

    /// Validates and processes a transaction, then calls `next.run(..)`.
    fn ante_handle(
        &self,
        ctx: &mut AnteContext<'_>,
        tx: &DecodedTx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), TxError>;
}

/// The remainder of a decorator chain.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    rest: &'a [Box<dyn AnteDecorator>],
}

impl<'a> Next<'a> {
    /// A continuation over `rest`.
    pub fn new(rest: &'a [Box<dyn AnteDecorator>]) -> Self {
        Self { rest }
    }

    /// A continuation that accepts immediately.
    pub fn end() -> Self {
        Self { rest: &[] }
    }

    /// Runs the next decorator, or accepts when none remain.
    pub fn run(self, ctx: &mut AnteContext<'_>, tx: &DecodedTx, simulate: bool) -> Result<(), TxError> {
        match self.rest.split_first() {
            Some((head, tail)) => {
                tracing::trace!(
                    target: "ante",
                    stage = head.name(),
                    gas_used = ctx.gas_meter.consumed(),
                    "entering stage"
                );
                head.ante_handle(ctx, tx, simulate, Next { rest: tail })
            }
            None => Ok(()),
        }
    }
}
