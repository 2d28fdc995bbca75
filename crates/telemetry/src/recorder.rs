use std::sync::atomic::{AtomicBool, Ordering};

use prometheus::{Encoder, TextEncoder};
use relay_fee_config::TelemetryConfig;

use crate::metrics::*;

static METRICS_ENABLED: AtomicBool = AtomicBool::new(true);

/// Apply the telemetry section of the middleware config
pub fn configure(config: &TelemetryConfig) {
    METRICS_ENABLED.store(config.metrics_enabled, Ordering::Relaxed);
}

pub fn metrics_enabled() -> bool {
    METRICS_ENABLED.load(Ordering::Relaxed)
}

/// How a packet's escrow was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    Acknowledged,
    TimedOut,
}

impl SettlementOutcome {
    fn as_label(self) -> &'static str {
        match self {
            SettlementOutcome::Acknowledged => "acknowledgement",
            SettlementOutcome::TimedOut => "timeout",
        }
    }
}

pub fn record_packet_settled(outcome: SettlementOutcome) {
    if metrics_enabled() {
        PACKETS_SETTLED.with_label_values(&[outcome.as_label()]).inc();
    }
}

/// `reason` is a short label such as `blocked` or `no_payee`
pub fn record_payout_redirected(reason: &str) {
    if metrics_enabled() {
        PAYOUTS_REDIRECTED.with_label_values(&[reason]).inc();
    }
}

pub fn record_fee_escrowed() {
    if metrics_enabled() {
        FEES_ESCROWED.inc();
    }
}

pub fn record_closure_refund(refunded: bool) {
    if metrics_enabled() {
        let result = if refunded { "refunded" } else { "skipped" };
        CLOSURE_REFUNDS.with_label_values(&[result]).inc();
    }
}

pub fn record_fee_enabled(enabled: bool) {
    if metrics_enabled() {
        let transition = if enabled { "enabled" } else { "disabled" };
        FEE_ENABLEMENT.with_label_values(&[transition]).inc();
    }
}

pub fn record_module_locked() {
    if metrics_enabled() {
        MODULE_LOCKS.inc();
    }
}

/// Export metrics in Prometheus text format
pub fn gather_metrics() -> Result<String, MetricsError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| MetricsError::EncodingError(e.to_string()))?;

    String::from_utf8(buffer).map_err(|e| MetricsError::EncodingError(e.to_string()))
}

/// Metrics error types
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("encoding error: {0}")]
    EncodingError(String),
}
