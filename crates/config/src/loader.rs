//! Configuration loading from multiple sources

use crate::{ConfigError, MiddlewareConfig, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use std::path::Path;

/// Default prefix for environment overrides
pub const ENV_PREFIX: &str = "RELAY_FEE";

/// Configuration loader with support for multiple formats and sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file
    ///
    /// Supports TOML, YAML, and JSON formats based on file extension
    pub fn from_file(path: &Path) -> Result<MiddlewareConfig> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConfigError::LoadError("No file extension found".to_string()))?;

        let content = std::fs::read_to_string(path)?;

        match extension {
            "toml" => Self::from_toml(&content),
            "yaml" | "yml" => Self::from_yaml(&content),
            "json" => Self::from_json(&content),
            _ => Err(ConfigError::LoadError(format!(
                "Unsupported file extension: {}",
                extension
            ))),
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<MiddlewareConfig> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration from YAML string
    pub fn from_yaml(content: &str) -> Result<MiddlewareConfig> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration from JSON string
    pub fn from_json(content: &str) -> Result<MiddlewareConfig> {
        serde_json::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration from environment variables
    ///
    /// Uses default prefix "RELAY_FEE"
    pub fn from_env() -> Result<MiddlewareConfig> {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Load configuration from environment variables with custom prefix
    ///
    /// Variables are named PREFIX_SECTION__KEY, for example
    /// RELAY_FEE_FEE__MAX_COUNTERPARTY_PAYEE_LENGTH=4096
    pub fn from_env_with_prefix(prefix: &str) -> Result<MiddlewareConfig> {
        let config = Config::builder()
            .add_source(env_source(prefix))
            .build()?;

        config.try_deserialize().map_err(ConfigError::from)
    }

    /// Load configuration from file with environment variable overrides
    pub fn from_file_with_env(path: &Path, env_prefix: &str) -> Result<MiddlewareConfig> {
        Self::builder()
            .add_file(path, true)
            .add_env(env_prefix)
            .build()
    }

    /// Build configuration using the config crate's builder pattern
    pub fn builder() -> ConfigLoaderBuilder {
        ConfigLoaderBuilder {
            builder: Config::builder(),
        }
    }
}

fn env_source(prefix: &str) -> Environment {
    Environment::with_prefix(prefix)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Builder for layered configuration sources
pub struct ConfigLoaderBuilder {
    builder: ConfigBuilder<config::builder::DefaultState>,
}

impl ConfigLoaderBuilder {
    /// Add a configuration file source
    pub fn add_file(mut self, path: &Path, required: bool) -> Self {
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            Some("json") => FileFormat::Json,
            _ => FileFormat::Toml,
        };

        self.builder = self
            .builder
            .add_source(File::from(path).format(format).required(required));
        self
    }

    /// Add environment variable source with prefix
    pub fn add_env(mut self, prefix: &str) -> Self {
        self.builder = self.builder.add_source(env_source(prefix));
        self
    }

    /// Set a default value for a key
    pub fn set_default(mut self, key: &str, value: &str) -> Result<Self> {
        self.builder = self.builder.set_default(key, value)?;
        Ok(self)
    }

    /// Build the final configuration
    pub fn build(self) -> Result<MiddlewareConfig> {
        let config = self.builder.build()?;
        config.try_deserialize().map_err(ConfigError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogFormat;
    use std::io::Write;

    #[test]
    fn test_load_from_toml() {
        let toml = r#"
            [fee]
            module_account = "feeibc"
            max_counterparty_payee_length = 512

            [logging]
            level = "debug"
            format = "pretty"

            [telemetry]
            metrics_enabled = false
        "#;

        let config = ConfigLoader::from_toml(toml).unwrap();
        assert_eq!(config.fee.max_counterparty_payee_length, 512);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(!config.telemetry.metrics_enabled);
    }

    #[test]
    fn test_load_from_yaml() {
        let yaml = r#"
fee:
  module_account: feeibc
logging:
  level: warn
        "#;

        let config = ConfigLoader::from_yaml(yaml).unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.fee.max_counterparty_payee_length, 2048);
    }

    #[test]
    fn test_load_from_json() {
        let json = r#"
{
  "fee": { "max_counterparty_payee_length": 64 },
  "telemetry": { "metrics_enabled": true }
}
        "#;

        let config = ConfigLoader::from_json(json).unwrap();
        assert_eq!(config.fee.max_counterparty_payee_length, 64);
        assert_eq!(config.fee.module_account, "feeibc");
    }

    #[test]
    fn test_load_from_file() {
        let toml = r#"
[logging]
level = "trace"
        "#;

        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(toml.as_bytes()).unwrap();

        let config = ConfigLoader::from_file(file.path()).unwrap();
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let file = tempfile::Builder::new()
            .suffix(".ini")
            .tempfile()
            .unwrap();

        let err = ConfigLoader::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }

    #[test]
    fn test_builder_defaults() {
        let config = ConfigLoader::builder()
            .set_default("logging.level", "error")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.logging.level, "error");
        assert_eq!(config.fee.module_account, "feeibc");
    }
}
