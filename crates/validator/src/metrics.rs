// Path: crates/validator/src/metrics.rs
use ante_telemetry::sinks::{AdmissionMetricsSink, NopSink};
use once_cell::sync::OnceCell;

static NOP_SINK: NopSink = NopSink;
/// The installed admission sink. Unset means metrics are dropped.
pub static ADMISSION_SINK: OnceCell<&'static dyn AdmissionMetricsSink> = OnceCell::new();

/// The installed admission sink, or a no-op sink.
pub fn admission_metrics() -> &'static dyn AdmissionMetricsSink {
    ADMISSION_SINK.get().copied().unwrap_or(&NOP_SINK)
}
