// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling core logic from the backend.

/// A no-op sink for use in tests where metrics are not needed.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// A sink for admission pipeline metrics.
pub trait AdmissionMetricsSink: Send + Sync + std::fmt::Debug {
    /// Counts an accepted transaction.
    fn inc_admitted(&self, mode: &str);
    /// Counts a rejected transaction by error class.
    fn inc_rejected(&self, mode: &str, class: &str);
    /// Counts a panic captured by the fault-recovery middleware.
    fn inc_internal_fault(&self, label: &str);
    /// Counts a parallel attempt re-executed because its reads went stale.
    fn inc_reexecuted(&self);
    /// Observes the gas consumed by one attempt.
    fn observe_gas_used(&self, gas: u64);
}
impl AdmissionMetricsSink for NopSink {
    fn inc_admitted(&self, _mode: &str) {}
    fn inc_rejected(&self, _mode: &str, _class: &str) {}
    fn inc_internal_fault(&self, _label: &str) {}
    fn inc_reexecuted(&self) {}
    fn observe_gas_used(&self, _gas: u64) {}
}
