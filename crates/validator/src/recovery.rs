// Path: crates/validator/src/recovery.rs
use crate::metrics::admission_metrics;
use ante_types::error::TxError;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error};

/// Converts a panic inside an admission attempt into a rejection.
///
/// Every attempt runs against its own scratch layer, so nothing a panicking
/// attempt wrote is visible once the panic is caught. The node keeps serving.
#[derive(Debug, Default)]
pub struct FaultRecovery {
    faults: AtomicU64,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl FaultRecovery {
    /// Creates a recovery wrapper with a zero fault count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f`, mapping a panic to [`TxError::Internal`].
    ///
    /// Expected rejections are logged at debug level. Internal errors, caught
    /// or returned, are logged at error level with `label`.
    pub fn run<T>(&self, label: &str, f: impl FnOnce() -> Result<T, TxError>) -> Result<T, TxError> {
        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                if e.class().is_expected() {
                    debug!(target: "recovery", label, error = %e, "attempt rejected");
                } else {
                    error!(target: "recovery", label, error = %e, "internal error during admission");
                }
                Err(e)
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                self.faults.fetch_add(1, Ordering::Relaxed);
                admission_metrics().inc_internal_fault(label);
                error!(target: "recovery", label, panic = %message, "recovered from panic during admission");
                Err(TxError::Internal(format!("{label}: {message}")))
            }
        }
    }

    /// Number of panics caught so far.
    pub fn fault_count(&self) -> u64 {
        self.faults.load(Ordering::Relaxed)
    }
}
