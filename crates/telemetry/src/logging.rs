use relay_fee_config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level when set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TracingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(&config.level)))
        .map_err(|e| TracingError::InitError(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().with_target(true).with_level(true).json())
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_level(true).pretty())
            .try_init(),
    };

    result.map_err(|e| TracingError::InitError(e.to_string()))
}

fn default_directives(level: &str) -> String {
    format!("{level},relay_fee=debug")
}

/// Span carrying the identity of the packet being processed
pub fn packet_span(port_id: &str, channel_id: &str, sequence: u64) -> tracing::Span {
    tracing::info_span!(
        "packet",
        port_id = %port_id,
        channel_id = %channel_id,
        sequence = sequence,
    )
}

/// Tracing error types
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("tracing initialization error: {0}")]
    InitError(String),
}
