//! Core configuration structures for the relay fee middleware

use serde::{Deserialize, Serialize};

/// Largest counterparty payee address accepted by default, in bytes
pub const DEFAULT_MAX_COUNTERPARTY_PAYEE_LENGTH: usize = 2048;

/// Main middleware configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Fee escrow and registration settings
    #[serde(default)]
    pub fee: FeeConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Prometheus counters
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Fee module settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Name of the module account holding escrowed fees
    #[serde(default = "default_module_account")]
    pub module_account: String,

    /// Maximum byte length of a registered counterparty payee
    #[serde(default = "default_max_counterparty_payee_length")]
    pub max_counterparty_payee_length: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

/// Log output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Record settlement counters
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_module_account() -> String {
    "feeibc".to_string()
}

fn default_max_counterparty_payee_length() -> usize {
    DEFAULT_MAX_COUNTERPARTY_PAYEE_LENGTH
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            module_account: default_module_account(),
            max_counterparty_payee_length: default_max_counterparty_payee_length(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: default_true(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MiddlewareConfig::default();
        assert_eq!(config.fee.module_account, "feeibc");
        assert_eq!(config.fee.max_counterparty_payee_length, 2048);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.telemetry.metrics_enabled);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: MiddlewareConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, MiddlewareConfig::default());

        let config: MiddlewareConfig =
            serde_json::from_str(r#"{"logging":{"format":"pretty"}}"#).unwrap();
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.logging.level, "info");
    }
}
