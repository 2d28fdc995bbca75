//! Logging and metrics for the relay fee middleware
//!
//! - `init_tracing` installs a `tracing-subscriber` registry driven by
//!   [`LoggingConfig`](relay_fee_config::LoggingConfig)
//! - Prometheus counters track settlements, redirected payouts, closure
//!   refunds and module-lock engagements
//! - `gather_metrics` renders the text exposition format
//!
//! # Example
//!
//! ```no_run
//! use relay_fee_config::MiddlewareConfig;
//!
//! let config = MiddlewareConfig::default();
//! relay_fee_telemetry::init_tracing(&config.logging).unwrap();
//! relay_fee_telemetry::configure(&config.telemetry);
//!
//! relay_fee_telemetry::record_packet_settled(relay_fee_telemetry::SettlementOutcome::Acknowledged);
//! println!("{}", relay_fee_telemetry::gather_metrics().unwrap());
//! ```

pub mod metrics;
pub mod recorder;
pub mod logging;

pub use recorder::{
    configure, gather_metrics, metrics_enabled, record_closure_refund, record_fee_enabled,
    record_fee_escrowed, record_module_locked, record_packet_settled, record_payout_redirected,
    MetricsError, SettlementOutcome,
};
pub use logging::{init_tracing, packet_span, TracingError};
