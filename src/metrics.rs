use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use lazy_static::lazy_static;
use prometheus::{core::Collector, histogram_opts, HistogramVec, IntCounterVec, Registry};
use tracing::error;

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelayMetricsSnapshot {
    pub dispatches: u64,
    pub dispatch_success: u64,
    pub dispatch_failures: u64,
    pub dispatch_latency_total_us: u64,
}

static DISPATCHES: AtomicU64 = AtomicU64::new(0);
static DISPATCH_SUCCESS: AtomicU64 = AtomicU64::new(0);
static DISPATCH_FAILURES: AtomicU64 = AtomicU64::new(0);
static DISPATCH_LATENCY_TOTAL_US: AtomicU64 = AtomicU64::new(0);

lazy_static! {
    static ref RELAY_DISPATCHES_TOTAL: IntCounterVec = IntCounterVec::new(
        prometheus::Opts::new("copilot_relay_dispatches_total", "Total commands dispatched"),
        &["command"]
    )
    .unwrap();
    static ref RELAY_DISPATCH_FAILURES_TOTAL: IntCounterVec = IntCounterVec::new(
        prometheus::Opts::new(
            "copilot_relay_dispatch_failures_total",
            "Total dispatches degraded to an absent response"
        ),
        &["command"]
    )
    .unwrap();
    static ref RELAY_DISPATCH_DURATION: HistogramVec = HistogramVec::new(
        histogram_opts!(
            "copilot_relay_dispatch_duration_seconds",
            "Dispatch latency including handler and bridge time",
            vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0]
        ),
        &["command"]
    )
    .unwrap();
}

fn register<C>(registry: &Registry, collector: C)
where
    C: Collector + Clone + Send + Sync + 'static,
{
    if let Err(err) = registry.register(Box::new(collector.clone())) {
        if !matches!(err, prometheus::Error::AlreadyReg) {
            error!(?err, "failed to register relay metric");
        }
    }
}

pub fn register_metrics(registry: &Registry) {
    register(registry, RELAY_DISPATCHES_TOTAL.clone());
    register(registry, RELAY_DISPATCH_FAILURES_TOTAL.clone());
    register(registry, RELAY_DISPATCH_DURATION.clone());
}

pub fn record_dispatch(command: &str) {
    DISPATCHES.fetch_add(1, Ordering::Relaxed);
    RELAY_DISPATCHES_TOTAL.with_label_values(&[command]).inc();
}

pub fn record_dispatch_success(command: &str, duration: Duration) {
    DISPATCH_SUCCESS.fetch_add(1, Ordering::Relaxed);
    let micros = duration.as_micros().min(u64::MAX as u128) as u64;
    DISPATCH_LATENCY_TOTAL_US.fetch_add(micros, Ordering::Relaxed);
    RELAY_DISPATCH_DURATION
        .with_label_values(&[command])
        .observe(duration.as_secs_f64());
}

pub fn record_dispatch_failure(command: &str) {
    DISPATCH_FAILURES.fetch_add(1, Ordering::Relaxed);
    RELAY_DISPATCH_FAILURES_TOTAL
        .with_label_values(&[command])
        .inc();
}

pub fn snapshot() -> RelayMetricsSnapshot {
    RelayMetricsSnapshot {
        dispatches: DISPATCHES.load(Ordering::Relaxed),
        dispatch_success: DISPATCH_SUCCESS.load(Ordering::Relaxed),
        dispatch_failures: DISPATCH_FAILURES.load(Ordering::Relaxed),
        dispatch_latency_total_us: DISPATCH_LATENCY_TOTAL_US.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    DISPATCHES.store(0, Ordering::Relaxed);
    DISPATCH_SUCCESS.store(0, Ordering::Relaxed);
    DISPATCH_FAILURES.store(0, Ordering::Relaxed);
    DISPATCH_LATENCY_TOTAL_US.store(0, Ordering::Relaxed);
}
