// Path: crates/validator/src/batch.rs
use ante_api::transaction::DeferredSignature;
use ante_crypto::{BatchVerifier, CryptoError};
use ante_types::error::TxError;
use tracing::debug;

/// A batch of leaf signatures with the transaction each slot belongs to.
///
/// A slot is only indexed once the verifier has accepted it, so the slot
/// table and the verifier never disagree in length.
#[derive(Default)]
pub struct BatchSigJob {
    verifier: BatchVerifier,
    slot_to_tx_index: Vec<usize>,
}

impl BatchSigJob {
    /// Creates an empty job.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one leaf signature for the transaction at `tx_index`.
    pub fn add(&mut self, tx_index: usize, sig: &DeferredSignature) -> Result<(), CryptoError> {
        self.verifier
            .add(&sig.public_key, &sig.message, &sig.signature)?;
        self.slot_to_tx_index.push(tx_index);
        Ok(())
    }

    /// Number of queued slots.
    pub fn len(&self) -> usize {
        self.slot_to_tx_index.len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.slot_to_tx_index.is_empty()
    }

    /// Verifies every slot and folds the results into `errors`.
    pub fn finish(self, errors: &mut [Option<TxError>]) -> Result<(), TxError> {
        let (all_ok, per_slot) = self.verifier.verify();
        if all_ok && per_slot.len() == self.slot_to_tx_index.len() {
            return Ok(());
        }
        write_back(&per_slot, &self.slot_to_tx_index, errors)
    }
}

/// Records a failure for every transaction owning a failed slot.
///
/// An existing error for a transaction is never overwritten. A length
/// mismatch between the results and the slot table is an internal error.
pub fn write_back(
    per_slot: &[bool],
    slot_to_tx_index: &[usize],
    errors: &mut [Option<TxError>],
) -> Result<(), TxError> {
    if per_slot.len() != slot_to_tx_index.len() {
        return Err(TxError::Internal(format!(
            "batch verifier returned {} results for {} slots",
            per_slot.len(),
            slot_to_tx_index.len()
        )));
    }
    for (ok, tx_index) in per_slot.iter().zip(slot_to_tx_index) {
        if *ok {
            continue;
        }
        let slot = errors.get_mut(*tx_index).ok_or_else(|| {
            TxError::Internal(format!("slot maps to transaction {tx_index} outside the batch"))
        })?;
        if slot.is_none() {
            *slot = Some(TxError::Unauthorized("signature verification failed".into()));
        }
    }
    Ok(())
}

/// Verifies the deferred signatures of a batch of transactions together.
///
/// `prechecked` holds, per transaction, either the leaf signatures it
/// deferred or the error it already failed with. Failed transactions keep
/// their error and add nothing to the batch. Returns one entry per
/// transaction: `None` if every signature it deferred verified.
pub fn verify_signatures_batched(
    prechecked: Vec<Result<Vec<DeferredSignature>, TxError>>,
) -> Result<Vec<Option<TxError>>, TxError> {
    let mut errors: Vec<Option<TxError>> = Vec::with_capacity(prechecked.len());
    let mut job = BatchSigJob::new();

    for (tx_index, entry) in prechecked.into_iter().enumerate() {
        match entry {
            Err(e) => errors.push(Some(e)),
            Ok(sigs) => {
                let mut failure = None;
                for sig in &sigs {
                    // A signature that does not even parse fails its tx outright.
                    if let Err(e) = job.add(tx_index, sig) {
                        failure = Some(TxError::from(e));
                        break;
                    }
                }
                errors.push(failure);
            }
        }
    }

    debug!(target: "admission", slots = job.len(), txs = errors.len(), "verifying signature batch");
    job.finish(&mut errors)?;
    Ok(errors)
}
