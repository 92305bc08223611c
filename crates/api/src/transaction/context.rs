// Path: crates/api/src/transaction/context.rs
//! Defines the context for one admission attempt.

use crate::gas::GasMeter;
use crate::keeper::AccountFeeAccessor;
use crate::state::StateAccess;
use ante_crypto::{Ed25519PublicKey, PublicKey};
use ante_tx::DecodedTx;
use ante_types::app::{Event, ExecMode};
use ante_types::config::{AnteParams, MinGasPrice};
use ante_types::error::TxError;

/// How the signature stage treats cryptographic checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SigVerifyMode {
    /// Every signature is verified inside the chain.
    #[default]
    Immediate,
    /// Structural checks run inside the chain; the leaf signatures are
    /// recorded for a batch verifier instead.
    Deferred,
}

/// One leaf signature recorded for batch verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredSignature {
    /// The leaf key.
    pub public_key: Ed25519PublicKey,
    /// The sign document bytes.
    pub message: Vec<u8>,
    /// The raw signature.
    pub signature: Vec<u8>,
}

/// The mutable context for a single admission attempt.
///
/// Holds the attempt's gas meter and its scratch state layer. Neither is ever
/// shared with another transaction.
pub struct AnteContext<'a> {
    /// The execution mode.
    pub mode: ExecMode,
    /// The height of the block being built or checked against.
    pub block_height: u64,
    /// The chain identifier bound into every sign document.
    pub chain_id: &'a str,
    /// Auth parameters.
    pub params: &'a AnteParams,
    /// Local minimum gas prices, enforced in check mode only.
    pub min_gas_prices: &'a [MinGasPrice],
    /// Maximum nesting depth for multisig public keys.
    pub max_key_depth: usize,
    /// The gas meter. Holds no budget until the set-up stage installs one.
    pub gas_meter: GasMeter,
    /// The scratch state layer for this attempt.
    pub state: &'a mut dyn StateAccess,
    /// Account, balance and fee-grant access.
    pub accounts: &'a dyn AccountFeeAccessor,
    /// Events emitted so far.
    pub events: Vec<Event>,
    /// Whether signatures are verified in place or deferred.
    pub sig_verify: SigVerifyMode,
    /// Leaf signatures recorded in deferred mode.
    pub deferred_signatures: Vec<DeferredSignature>,
    supplied_keys: Option<Vec<Option<PublicKey>>>,
}

impl<'a> AnteContext<'a> {
    /// Creates a context with a zero gas budget and immediate verification.
    pub fn new(
        mode: ExecMode,
        chain_id: &'a str,
        block_height: u64,
        params: &'a AnteParams,
        state: &'a mut dyn StateAccess,
        accounts: &'a dyn AccountFeeAccessor,
    ) -> Self {
        Self {
            mode,
            block_height,
            chain_id,
            params,
            min_gas_prices: &[],
            max_key_depth: 1,
            gas_meter: GasMeter::new(0),
            state,
            accounts,
            events: Vec::new(),
            sig_verify: SigVerifyMode::Immediate,
            deferred_signatures: Vec::new(),
            supplied_keys: None,
        }
    }

    /// Sets the minimum gas prices.
    pub fn with_min_gas_prices(mut self, prices: &'a [MinGasPrice]) -> Self {
        self.min_gas_prices = prices;
        self
    }

    /// Sets the maximum multisig key depth.
    pub fn with_max_key_depth(mut self, depth: usize) -> Self {
        self.max_key_depth = depth;
        self
    }

    /// Sets the signature verification mode.
    pub fn with_sig_verify(mut self, mode: SigVerifyMode) -> Self {
        self.sig_verify = mode;
        self
    }

    /// The public keys supplied in the signer infos, parsed once and cached.
    ///
    /// Parsing happens on first use, so it is only paid for after the size
    /// charge by whichever stage needs the keys first.
    pub fn supplied_keys(&mut self, tx: &DecodedTx) -> Result<&[Option<PublicKey>], TxError> {
        if self.supplied_keys.is_none() {
            let keys = tx
                .signer_infos
                .iter()
                .map(|info| info.public_key(self.max_key_depth))
                .collect::<Result<Vec<_>, _>>()?;
            self.supplied_keys = Some(keys);
        }
        Ok(self.supplied_keys.as_deref().unwrap_or_default())
    }

    /// Appends an event.
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }
}
