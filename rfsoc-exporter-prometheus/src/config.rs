//! Configuration for the Prometheus exporter.

use std::net::SocketAddr;
use std::path::PathBuf;

use rfsoc_iio::LoggingConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default IIO device directory on RFSoC boards.
pub const DEFAULT_IIO_PREFIX: &str = "/sys/bus/iio/devices/iio:device0";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 2112;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Complete exporter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Directory holding the `*_raw`, `*_scale`, `*_offset` sensor files.
    pub iio_prefix: PathBuf,

    /// Whether `--debug` was given.
    #[serde(default)]
    pub debug: bool,

    /// Prometheus exporter settings.
    #[serde(default)]
    pub prometheus: PrometheusConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Prometheus HTTP endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrometheusConfig {
    /// Host to listen on (default: "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on (default: 2112).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path for metrics endpoint (default: "/metrics").
    #[serde(default = "default_path")]
    pub path: String,

    /// Metric name prefix (default: "rfsoc").
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_path() -> String {
    "/metrics".to_string()
}

fn default_prefix() -> String {
    "rfsoc".to_string()
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            path: default_path(),
            prefix: default_prefix(),
        }
    }
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            iio_prefix: PathBuf::from(DEFAULT_IIO_PREFIX),
            debug: false,
            prometheus: PrometheusConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl PrometheusConfig {
    /// Parse the listen address from host and port.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Validation(format!("Invalid listen address: {}", e)))
    }
}

impl ExporterConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.prometheus.listen_addr()?;

        if !self.prometheus.path.starts_with('/') || self.prometheus.path == "/" {
            return Err(ConfigError::Validation(format!(
                "metrics path '{}' must start with '/' and not be the root",
                self.prometheus.path
            )));
        }

        if self.prometheus.prefix.is_empty() {
            return Err(ConfigError::Validation(
                "metric prefix must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExporterConfig::default();

        assert_eq!(
            config.iio_prefix,
            PathBuf::from("/sys/bus/iio/devices/iio:device0")
        );
        assert!(!config.debug);
        assert_eq!(config.prometheus.port, 2112);
        assert_eq!(config.prometheus.path, "/metrics");
        assert_eq!(config.prometheus.prefix, "rfsoc");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_listen_addr() {
        let config = PrometheusConfig {
            host: "127.0.0.1".to_string(),
            port: 9100,
            ..Default::default()
        };

        assert_eq!(
            config.listen_addr().unwrap(),
            "127.0.0.1:9100".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_validate_bad_host() {
        let config = ExporterConfig {
            prometheus: PrometheusConfig {
                host: "not a host".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_root_metrics_path() {
        let config = ExporterConfig {
            prometheus: PrometheusConfig {
                path: "/".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(ExporterConfig::default()).unwrap();

        assert_eq!(json["prometheus"]["port"], 2112);
        assert_eq!(json["logging"]["format"], "text");
    }
}
