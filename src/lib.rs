//! Relayer incentivization for IBC packet lifecycles.
//!
//! Packet senders escrow fees for the relayers that deliver their packets;
//! the middleware settles them when an acknowledgement or timeout comes
//! back, and refunds them when a channel closes.
//!
//! - [`types`]: wire and data model
//! - [`middleware`]: the fee middleware, its message entry points and queries
//! - [`config`]: configuration loading and validation
//! - [`telemetry`]: logging and metrics

pub use relay_fee_config as config;
pub use relay_fee_middleware as middleware;
pub use relay_fee_telemetry as telemetry;
pub use relay_fee_types as types;

pub use relay_fee_middleware::{FeeDeps, FeeError, FeeMiddleware, IbcModule};

use relay_fee_config::{validate_config, ConfigError, MiddlewareConfig};
use relay_fee_telemetry::TracingError;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tracing(#[from] TracingError),
}

/// Validate `config`, install logging and switch metrics on or off.
///
/// Must run once per process, before the first callback.
pub fn init(config: &MiddlewareConfig) -> Result<(), InitError> {
    validate_config(config)?;
    relay_fee_telemetry::init_tracing(&config.logging)?;
    relay_fee_telemetry::configure(&config.telemetry);

    info!(
        module_account = %config.fee.module_account,
        metrics_enabled = config.telemetry.metrics_enabled,
        "relay fee middleware initialized"
    );
    Ok(())
}

/// Wrap `app` with fee middleware configured from `config`
pub fn wrap<A: IbcModule>(app: A, config: &MiddlewareConfig) -> FeeMiddleware<A> {
    FeeMiddleware::new(app, config.fee.clone())
}
