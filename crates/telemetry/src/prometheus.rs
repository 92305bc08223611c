// Path: crates/telemetry/src/prometheus.rs
//! A concrete implementation of the metrics sinks using the Prometheus crate.

use crate::sinks::*;
use once_cell::sync::Lazy;
use prometheus::{
    exponential_buckets, register_histogram, register_int_counter, register_int_counter_vec,
    Encoder, Histogram, IntCounter, IntCounterVec, TextEncoder,
};

// --- Metric Definitions ---

// COUNTER (correctly uses _total suffix)
static ADMITTED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "ante_admitted_total",
        "Total transactions accepted by the admission pipeline.",
        &["mode"]
    )
    .unwrap()
});
static REJECTED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "ante_rejected_total",
        "Total transactions rejected by the admission pipeline.",
        &["mode", "class"]
    )
    .unwrap()
});
static INTERNAL_FAULTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "ante_internal_faults_total",
        "Total panics captured by the fault-recovery middleware.",
        &["label"]
    )
    .unwrap()
});
static REEXECUTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "ante_reexecuted_total",
        "Total parallel attempts re-executed after their read set went stale."
    )
    .unwrap()
});

// HISTOGRAM
static GAS_USED: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "ante_gas_used",
        "Gas consumed per admission attempt.",
        exponential_buckets(1_000.0, 2.0, 16).unwrap()
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

impl AdmissionMetricsSink for PrometheusSink {
    fn inc_admitted(&self, mode: &str) {
        ADMITTED_TOTAL.with_label_values(&[mode]).inc();
    }
    fn inc_rejected(&self, mode: &str, class: &str) {
        REJECTED_TOTAL.with_label_values(&[mode, class]).inc();
    }
    fn inc_internal_fault(&self, label: &str) {
        INTERNAL_FAULTS_TOTAL.with_label_values(&[label]).inc();
    }
    fn inc_reexecuted(&self) {
        REEXECUTED_TOTAL.inc();
    }
    fn observe_gas_used(&self, gas: u64) {
        GAS_USED.observe(gas as f64);
    }
}

pub fn install() -> &'static dyn AdmissionMetricsSink {
    static SINK: PrometheusSink = PrometheusSink;
    &SINK
}

/// Renders every registered metric in the Prometheus text format.
pub fn render() -> String {
    let mut buffer = Vec::new();
    if TextEncoder::new()
        .encode(&prometheus::gather(), &mut buffer)
        .is_err()
    {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
