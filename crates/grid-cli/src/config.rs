//! Configuration for gridctl

use grid_deployer::DeployerConfig;
use grid_rmb::RmbConfig;
use serde::{Deserialize, Serialize};

/// Main CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridConfig {
    /// Message bus client
    #[serde(default)]
    pub rmb: RmbConfig,

    /// Deployment reconciler
    #[serde(default)]
    pub deployer: DeployerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_log_level() -> String {
    "warn".to_string()
}

impl GridConfig {
    /// Load configuration: defaults, then the optional file, then
    /// `GRID_<SECTION>__<KEY>` environment variables.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&GridConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Add environment variables with GRID_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("GRID")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GridConfig::default();
        assert_eq!(config.rmb.endpoint, "https://gridproxy.grid.tf");
        assert_eq!(config.rmb.error_threshold, 4);
        assert_eq!(config.deployer.wait_timeout_secs, 120);
        assert_eq!(config.logging.level, "warn");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_load_without_file() {
        let config = GridConfig::load(None).unwrap();
        assert_eq!(config.rmb.poll_interval_ms, 1000);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = GridConfig::load(Some("/nonexistent/gridctl")).unwrap();
        assert_eq!(config.rmb.expiration_secs, 3600);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[rmb]
endpoint = "http://localhost:8051"
twin_id = 11
poll_interval_ms = 250

[deployer]
wait_timeout_secs = 30

[logging]
json = true
"#
        )
        .unwrap();

        let config = GridConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.rmb.endpoint, "http://localhost:8051");
        assert_eq!(config.rmb.twin_id, 11);
        assert_eq!(config.rmb.poll_interval_ms, 250);
        assert_eq!(config.rmb.error_threshold, 4);
        assert_eq!(config.deployer.wait_timeout_secs, 30);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "warn");
    }
}
