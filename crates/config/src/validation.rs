//! Configuration validation

use crate::{ConfigError, MiddlewareConfig, Result};

/// Upper bound accepted for `fee.max_counterparty_payee_length`
pub const MAX_COUNTERPARTY_PAYEE_LENGTH_LIMIT: usize = 65_536;

/// Validation error details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate the entire middleware configuration
pub fn validate_config(config: &MiddlewareConfig) -> Result<()> {
    let mut errors = Vec::new();

    if let Err(e) = validate_module_account(&config.fee.module_account) {
        errors.push(e);
    }

    if config.fee.max_counterparty_payee_length == 0 {
        errors.push(ValidationError::new(
            "fee.max_counterparty_payee_length",
            "must be greater than 0",
        ));
    } else if config.fee.max_counterparty_payee_length > MAX_COUNTERPARTY_PAYEE_LENGTH_LIMIT {
        errors.push(ValidationError::new(
            "fee.max_counterparty_payee_length",
            format!("must be <= {MAX_COUNTERPARTY_PAYEE_LENGTH_LIMIT}"),
        ));
    }

    if let Err(e) = validate_log_level(&config.logging.level) {
        errors.push(e);
    }

    if !errors.is_empty() {
        let error_msg = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ConfigError::ValidationError(error_msg));
    }

    Ok(())
}

fn validate_module_account(name: &str) -> std::result::Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::new(
            "fee.module_account",
            "module account name is required",
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::new(
            "fee.module_account",
            format!("invalid module account name '{name}'"),
        ));
    }

    Ok(())
}

fn validate_log_level(level: &str) -> std::result::Result<(), ValidationError> {
    match level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new(
            "logging.level",
            format!(
                "invalid log level '{level}', must be one of: trace, debug, info, warn, error"
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FeeConfig, LoggingConfig};

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&MiddlewareConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let config = MiddlewareConfig {
            logging: LoggingConfig {
                level: "loud".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_collects_every_error() {
        let config = MiddlewareConfig {
            fee: FeeConfig {
                module_account: String::new(),
                max_counterparty_payee_length: 0,
            },
            logging: LoggingConfig {
                level: "verbose".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("fee.module_account"));
                assert!(msg.contains("fee.max_counterparty_payee_length"));
                assert!(msg.contains("logging.level"));
                assert_eq!(msg.matches("; ").count(), 2);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_payee_length_upper_bound() {
        let config = MiddlewareConfig {
            fee: FeeConfig {
                max_counterparty_payee_length: MAX_COUNTERPARTY_PAYEE_LENGTH_LIMIT + 1,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_module_account_charset() {
        let config = MiddlewareConfig {
            fee: FeeConfig {
                module_account: "fee ibc".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
