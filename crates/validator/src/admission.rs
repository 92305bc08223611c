// Path: crates/validator/src/admission.rs
use crate::ante::{default_ante_chain, AnteChain, AnteChainError};
use crate::batch::verify_signatures_batched;
use crate::metrics::admission_metrics;
use crate::recovery::FaultRecovery;
use ante_api::keeper::{AccountFeeAccessor, BaseAccount};
use ante_api::state::{
    apply_changes, ReadSet, RecordingState, StateAccess, StateChangeSet, StateOverlay,
};
use ante_api::transaction::{AnteContext, DeferredSignature, SigVerifyMode};
use ante_services::{BankKeeper, GenesisState, MsgRouter, StateAccountFeeAccessor};
use ante_state::{CacheStats, CommittedStore, PendingLayer};
use ante_tx::{DecodedTx, MsgRegistry, TxDecoder};
use ante_types::app::{tx_hash, Address, Event, ExecMode};
use ante_types::config::NodeConfig;
use ante_types::error::{ConfigError, StateError, TxError};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while building or driving the engine itself, as opposed to
/// rejections of individual transactions.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The node configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The genesis document could not be applied.
    #[error("genesis rejected: {0}")]
    Genesis(TxError),
    /// The committed store failed.
    #[error("state error: {0}")]
    State(#[from] StateError),
    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
    /// The decorator list violates the ordering rule.
    #[error("invalid ante chain: {0}")]
    Chain(#[from] AnteChainError),
}

/// An accepted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmitOutcome {
    /// Hex SHA-256 of the raw bytes.
    pub tx_hash: String,
    /// The fee's gas limit.
    pub gas_wanted: u64,
    /// Gas consumed by the attempt.
    pub gas_used: u64,
    /// Events emitted by the ante chain and the messages.
    pub events: Vec<Event>,
}

/// A rejected transaction. Consumed gas is reported, never refunded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("tx {tx_hash} rejected: {error}")]
pub struct AdmitFailure {
    /// Hex SHA-256 of the raw bytes.
    pub tx_hash: String,
    /// The fee's gas limit, or zero if the tx never decoded.
    pub gas_wanted: u64,
    /// Gas consumed before the rejection.
    pub gas_used: u64,
    /// Why the transaction was rejected.
    pub error: TxError,
}

/// The result of one admission attempt.
pub type AdmitResult = Result<AdmitOutcome, AdmitFailure>;

struct Attempt {
    gas_wanted: u64,
    gas_used: u64,
    ante_passed: bool,
    result: Result<Vec<Event>, TxError>,
    changes: Option<StateChangeSet>,
    read_set: ReadSet,
    deferred: Vec<DeferredSignature>,
}

struct EngineState {
    store: CommittedStore,
    check: PendingLayer,
    deliver: PendingLayer,
}

impl EngineState {
    fn layer(&self, mode: ExecMode) -> &PendingLayer {
        match mode {
            ExecMode::Deliver => &self.deliver,
            ExecMode::Check | ExecMode::Simulate => &self.check,
        }
    }
}

/// Admits transactions against the committed store.
///
/// Check mode writes into the check layer and Deliver mode into the deliver
/// layer. Simulate mode runs against the check layer and keeps nothing.
/// [`commit_block`](Self::commit_block) flushes the deliver layer into the
/// store and resets the check layer.
///
/// Attempts run optimistically under the read lock while recording every
/// read. A settling pass under the write lock then re-validates each read set
/// and re-executes an attempt whose reads went stale, so two transactions
/// from the same signer at the same sequence never both land.
pub struct AdmissionEngine {
    config: NodeConfig,
    decoder: TxDecoder,
    chain: AnteChain,
    accounts: StateAccountFeeAccessor,
    router: MsgRouter,
    recovery: FaultRecovery,
    state: RwLock<EngineState>,
    height: AtomicU64,
    pool: Option<rayon::ThreadPool>,
}

impl AdmissionEngine {
    /// Builds an engine with the default ante chain and applies `genesis`.
    pub fn new(config: NodeConfig, genesis: &GenesisState) -> Result<Self, EngineError> {
        Self::with_ante_chain(config, genesis, default_ante_chain())
    }

    /// Builds an engine running `chain` and applies `genesis`.
    pub fn with_ante_chain(
        config: NodeConfig,
        genesis: &GenesisState,
        chain: AnteChain,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let bank = BankKeeper::new(&config.fee_collector);
        let mut store = CommittedStore::in_memory(config.cache_capacity);
        let changes = {
            let mut overlay = StateOverlay::new(&store);
            genesis
                .apply(&mut overlay, &bank)
                .map_err(EngineError::Genesis)?;
            overlay.into_ordered_batch()
        };
        store.commit(changes)?;

        let pool = match config.workers {
            0 => None,
            n => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| EngineError::ThreadPool(e.to_string()))?,
            ),
        };

        info!(
            target: "admission",
            chain_id = %config.chain_id,
            accounts = genesis.accounts.len(),
            stages = chain.len(),
            "admission engine ready"
        );
        Ok(Self {
            decoder: TxDecoder::new(MsgRegistry::with_default_messages(), config.decode.clone()),
            accounts: StateAccountFeeAccessor::new(bank),
            router: MsgRouter::new(bank),
            recovery: FaultRecovery::new(),
            state: RwLock::new(EngineState {
                store,
                check: PendingLayer::new(),
                deliver: PendingLayer::new(),
            }),
            height: AtomicU64::new(1),
            pool,
            chain,
            config,
        })
    }

    /// The configuration in force.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// The height of the block being built.
    pub fn height(&self) -> u64 {
        self.height.load(Ordering::SeqCst)
    }

    /// Panics caught by the fault-recovery middleware so far.
    pub fn fault_count(&self) -> u64 {
        self.recovery.fault_count()
    }

    /// Hit and miss counts of the shared read cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.read_state().store.cache_stats()
    }

    /// Reads an account as deliver mode currently sees it.
    pub fn account(&self, address: &Address) -> Result<Option<BaseAccount>, TxError> {
        let guard = self.read_state();
        let view = guard.deliver.view(&guard.store);
        self.accounts.get_account(&view, address)
    }

    /// Reads a balance as deliver mode currently sees it.
    pub fn balance(&self, address: &Address, denom: &str) -> Result<u128, TxError> {
        let guard = self.read_state();
        let view = guard.deliver.view(&guard.store);
        BankKeeper::new(&self.config.fee_collector).balance(&view, address, denom)
    }

    /// Decodes and admits one transaction.
    pub fn admit_transaction(&self, raw: &[u8], mode: ExecMode) -> AdmitResult {
        let hash = hex_hash(raw);
        let tx = match self.recovery.run("decode", || self.decoder.decode(raw)) {
            Ok(tx) => tx,
            Err(e) => return self.finish(mode, hash, Err(e)),
        };
        let height = self.height();

        let attempt = {
            let guard = self.read_state();
            let view = guard.layer(mode).view(&guard.store);
            self.execute(&view, &tx, mode, height, SigVerifyMode::Immediate)
        };
        let attempt = match attempt {
            Ok(attempt) if mode != ExecMode::Simulate => {
                let mut guard = self.write_state();
                self.settle(&mut guard, &tx, mode, height, attempt)
            }
            other => other,
        };
        self.finish(mode, hash, attempt)
    }

    /// Admits a batch, in order, verifying all signatures together.
    ///
    /// Decoding and the ante chain run in parallel with signature checks
    /// deferred. The deferred signatures of every attempt that passed the
    /// chain are then verified as one batch, and the survivors are settled
    /// in input order.
    pub fn admit_batch(&self, raws: &[Vec<u8>], mode: ExecMode) -> Vec<AdmitResult> {
        let decoded: Vec<Result<DecodedTx, TxError>> = self.in_pool(|| {
            raws.par_iter()
                .map(|raw| self.recovery.run("decode", || self.decoder.decode(raw)))
                .collect()
        });
        let height = self.height();

        let mut attempts: Vec<Result<Attempt, TxError>> = {
            let guard = self.read_state();
            let view = guard.layer(mode).view(&guard.store);
            self.in_pool(|| {
                decoded
                    .par_iter()
                    .map(|tx| match tx {
                        Ok(tx) => self.execute(&view, tx, mode, height, SigVerifyMode::Deferred),
                        Err(e) => Err(e.clone()),
                    })
                    .collect()
            })
        };

        let prechecked: Vec<Result<Vec<DeferredSignature>, TxError>> = attempts
            .iter_mut()
            .map(|attempt| match attempt {
                Ok(a) if a.ante_passed => Ok(std::mem::take(&mut a.deferred)),
                Ok(a) => Err(a
                    .result
                    .as_ref()
                    .err()
                    .cloned()
                    .unwrap_or_else(|| TxError::Internal("failed attempt carries no error".into()))),
                Err(e) => Err(e.clone()),
            })
            .collect();
        let sig_errors = self
            .in_pool(|| self.recovery.run("batch_verify", || verify_signatures_batched(prechecked)))
            .unwrap_or_else(|e| vec![Some(e); attempts.len()]);

        let mut settled_ok = vec![false; attempts.len()];
        for ((attempt, sig_error), verified) in
            attempts.iter_mut().zip(sig_errors).zip(settled_ok.iter_mut())
        {
            let Ok(a) = attempt else { continue };
            if !a.ante_passed {
                *verified = true;
                continue;
            }
            match sig_error {
                None => *verified = true,
                Some(e) => {
                    a.result = Err(e);
                    a.changes = None;
                }
            }
        }

        if mode != ExecMode::Simulate {
            let mut guard = self.write_state();
            for ((slot, tx), settle) in attempts.iter_mut().zip(&decoded).zip(&settled_ok) {
                if !*settle {
                    continue;
                }
                let Ok(tx) = tx else { continue };
                let taken = std::mem::replace(slot, Err(TxError::Internal("attempt in flight".into())));
                *slot = match taken {
                    Ok(a) => self.settle(&mut guard, tx, mode, height, a),
                    Err(e) => Err(e),
                };
            }
        }

        raws.iter()
            .zip(attempts)
            .map(|(raw, attempt)| self.finish(mode, hex_hash(raw), attempt))
            .collect()
    }

    /// Flushes the deliver layer into the store, resets the check layer and
    /// moves to the next height. Returns the new height.
    pub fn commit_block(&self) -> Result<u64, EngineError> {
        let mut guard = self.write_state();
        let changes = guard.deliver.take();
        let version = guard.store.commit(changes)?;
        guard.check.clear();
        let height = self.height.fetch_add(1, Ordering::SeqCst) + 1;
        info!(target: "admission", height, version, "block committed");
        Ok(height)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, EngineState> {
        self.state.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.state.write().unwrap_or_else(|p| p.into_inner())
    }

    fn in_pool<R: Send>(&self, f: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }

    fn execute(
        &self,
        view: &dyn StateAccess,
        tx: &DecodedTx,
        mode: ExecMode,
        height: u64,
        sig_verify: SigVerifyMode,
    ) -> Result<Attempt, TxError> {
        self.recovery
            .run("execute", || self.execute_unguarded(view, tx, mode, height, sig_verify))
    }

    fn execute_unguarded(
        &self,
        view: &dyn StateAccess,
        tx: &DecodedTx,
        mode: ExecMode,
        height: u64,
        sig_verify: SigVerifyMode,
    ) -> Result<Attempt, TxError> {
        let simulate = mode.is_simulate();
        let recorder = RecordingState::new(view);
        let mut overlay = StateOverlay::new(&recorder);

        let mut ctx = AnteContext::new(
            mode,
            &self.config.chain_id,
            height,
            &self.config.ante,
            &mut overlay,
            &self.accounts,
        )
        .with_min_gas_prices(&self.config.min_gas_prices)
        .with_max_key_depth(self.config.decode.max_nesting_depth)
        .with_sig_verify(sig_verify);
        let ante = self.chain.run(&mut ctx, tx, simulate);
        let gas_used = ctx.gas_meter.consumed();
        let mut events = ctx.events;
        let deferred = ctx.deferred_signatures;

        let ante_passed = ante.is_ok();
        let result = match ante {
            Err(e) => Err(e),
            Ok(()) if mode == ExecMode::Check => Ok(events),
            Ok(()) => {
                let msgs = tx.msgs()?;
                let mut scratch = StateOverlay::new(&overlay);
                match self.router.execute(&mut scratch, &msgs, height) {
                    Ok(msg_events) => {
                        let changes = scratch.into_ordered_batch();
                        apply_changes(&mut overlay, changes)?;
                        events.extend(msg_events);
                        Ok(events)
                    }
                    // The fee and sequence bump stay; message writes go.
                    Err(e) => Err(e),
                }
            }
        };

        let changes = overlay.into_ordered_batch();
        let changes = (ante_passed && !simulate).then_some(changes);
        Ok(Attempt {
            gas_wanted: tx.fee.gas_limit,
            gas_used,
            ante_passed,
            result,
            changes,
            read_set: recorder.into_read_set(),
            deferred,
        })
    }

    fn settle(
        &self,
        state: &mut EngineState,
        tx: &DecodedTx,
        mode: ExecMode,
        height: u64,
        attempt: Attempt,
    ) -> Result<Attempt, TxError> {
        let EngineState { store, check, deliver } = state;
        let layer = match mode {
            ExecMode::Deliver => deliver,
            ExecMode::Check | ExecMode::Simulate => check,
        };

        let mut attempt = {
            let view = layer.view(&*store);
            if attempt.read_set.is_valid_against(&view)? {
                attempt
            } else {
                admission_metrics().inc_reexecuted();
                debug!(target: "admission", tx = %tx.hash_hex(), "reads went stale, re-executing");
                self.execute(&view, tx, mode, height, SigVerifyMode::Immediate)?
            }
        };
        if let Some(changes) = attempt.changes.take() {
            layer.absorb(changes);
        }
        Ok(attempt)
    }

    fn finish(&self, mode: ExecMode, tx_hash: String, attempt: Result<Attempt, TxError>) -> AdmitResult {
        let metrics = admission_metrics();
        let (gas_wanted, gas_used, result) = match attempt {
            Ok(a) => (a.gas_wanted, a.gas_used, a.result),
            Err(e) => (0, 0, Err(e)),
        };
        metrics.observe_gas_used(gas_used);

        match result {
            Ok(events) => {
                metrics.inc_admitted(mode.as_str());
                debug!(target: "admission", tx = %tx_hash, mode = mode.as_str(), gas_wanted, gas_used, "admitted");
                Ok(AdmitOutcome {
                    tx_hash,
                    gas_wanted,
                    gas_used,
                    events,
                })
            }
            Err(error) => {
                let class = error.class();
                metrics.inc_rejected(mode.as_str(), class.as_str());
                debug!(
                    target: "admission",
                    tx = %tx_hash,
                    mode = mode.as_str(),
                    class = class.as_str(),
                    code = error.code(),
                    gas_used,
                    error = %error,
                    "rejected"
                );
                Err(AdmitFailure {
                    tx_hash,
                    gas_wanted,
                    gas_used,
                    error,
                })
            }
        }
    }
}

fn hex_hash(raw: &[u8]) -> String {
    hex::encode(tx_hash(raw))
}
