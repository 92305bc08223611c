// Path: crates/api/src/gas.rs
//! The per-attempt gas meter.

use ante_types::error::TxError;

/// An integer gas budget with a monotonic consumed counter.
///
/// A meter is created for one admission attempt and never shared between
/// transactions. Exhaustion is sticky: once a charge fails, every later charge
/// on the same meter fails too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasMeter {
    limit: u64,
    consumed: u64,
    infinite: bool,
    exhausted_at: Option<String>,
}

impl GasMeter {
    /// A meter that fails once consumption would exceed `limit`.
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            consumed: 0,
            infinite: false,
            exhausted_at: None,
        }
    }

    /// A meter without a limit, used in simulation. Consumption still
    /// fails on `u64` overflow.
    pub fn infinite() -> Self {
        Self {
            limit: u64::MAX,
            consumed: 0,
            infinite: true,
            exhausted_at: None,
        }
    }

    /// Charges `amount` under `label`.
    ///
    /// On failure the consumed counter is left unchanged; the charge is not
    /// truncated to the remaining budget.
    pub fn consume(&mut self, amount: u64, label: &str) -> Result<(), TxError> {
        if let Some(location) = &self.exhausted_at {
            return Err(self.out_of_gas(location.clone()));
        }
        match self.consumed.checked_add(amount) {
            Some(total) if total <= self.limit => {
                self.consumed = total;
                Ok(())
            }
            _ => {
                self.exhausted_at = Some(label.to_string());
                Err(self.out_of_gas(label.to_string()))
            }
        }
    }

    fn out_of_gas(&self, location: String) -> TxError {
        TxError::OutOfGas {
            location,
            limit: self.limit,
            used: self.consumed,
        }
    }

    /// Gas consumed so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// The budget. `u64::MAX` for an infinite meter.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Gas still available.
    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.consumed)
    }

    /// Returns true once any charge has failed.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted_at.is_some()
    }

    /// Returns true for a simulation meter.
    pub fn is_infinite(&self) -> bool {
        self.infinite
    }
}
