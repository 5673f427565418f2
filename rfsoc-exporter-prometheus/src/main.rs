//! Prometheus exporter for RFSoC IIO sensors.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use rfsoc_iio::{LogFormat, LoggingConfig, init_tracing};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use rfsoc_exporter_prometheus::config::{DEFAULT_IIO_PREFIX, DEFAULT_PORT, PrometheusConfig};
use rfsoc_exporter_prometheus::{ExporterConfig, HttpServer, SensorCollector};

/// Prometheus exporter for RFSoC IIO sensors.
#[derive(Parser, Debug)]
#[command(name = "rfsoc-exporter-prometheus")]
#[command(about = "Export RFSoC IIO sensor readings as Prometheus metrics")]
#[command(version)]
struct Args {
    /// Turn on debug mode.
    #[arg(long)]
    debug: bool,

    /// Prefix to the IIO device directory.
    #[arg(long = "iioPrefix", default_value = DEFAULT_IIO_PREFIX)]
    iio_prefix: PathBuf,

    /// Data port to be used.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// HTTP listen host.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Log output format (text, json).
    #[arg(long, default_value = "text")]
    log_format: LogFormat,
}

impl Args {
    fn into_config(self) -> ExporterConfig {
        ExporterConfig {
            logging: LoggingConfig::for_debug(self.debug, self.log_format),
            iio_prefix: self.iio_prefix,
            debug: self.debug,
            prometheus: PrometheusConfig {
                host: self.host,
                port: self.port,
                ..Default::default()
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Args::parse().into_config();
    config.validate()?;

    init_tracing(&config.logging)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting RFSoC Prometheus Exporter");
    if let Ok(effective) = serde_json::to_string(&config) {
        debug!(config = %effective, "Effective configuration");
    }

    // Discovery runs exactly once, before the listener starts
    info!(dir = %config.iio_prefix.display(), "Registering all available sensor gauges");
    let collector = Arc::new(SensorCollector::discover(
        config.iio_prefix.clone(),
        &config.prometheus.prefix,
    ));
    info!(sensors = collector.bindings().len(), "Sensor gauges registered");

    let listen_addr = config.prometheus.listen_addr()?;
    let http_server = HttpServer::new(
        collector.clone(),
        listen_addr,
        config.prometheus.path.clone(),
    );

    // Create shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut http_task = tokio::spawn(async move { http_server.run(shutdown_rx).await });

    tokio::select! {
        result = &mut http_task => {
            // The server only returns early on bind or serve failure
            let result = result.map_err(|e| anyhow::anyhow!("HTTP server task failed: {}", e))?;
            if let Err(e) = &result {
                error!("HTTP server error: {}", e);
            }
            return result;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate_signal() => {
            info!("Received SIGTERM, shutting down...");
        }
    }

    shutdown_tx.send(true)?;

    let _ = tokio::time::timeout(Duration::from_secs(5), http_task).await;

    let stats = collector.stats();
    info!(
        scrapes = stats.scrapes,
        read_errors = stats.read_errors,
        sensors = stats.sensors,
        "Final statistics"
    );

    info!("Exporter stopped");
    Ok(())
}

async fn terminate_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let args = Args::try_parse_from(["rfsoc-exporter-prometheus"]).unwrap();

        assert!(!args.debug);
        assert_eq!(args.iio_prefix, PathBuf::from("/sys/bus/iio/devices/iio:device0"));
        assert_eq!(args.port, 2112);
        assert_eq!(args.log_format, LogFormat::Text);
    }

    #[test]
    fn test_original_flag_names() {
        let args = Args::try_parse_from([
            "rfsoc-exporter-prometheus",
            "--debug",
            "--iioPrefix",
            "/tmp/iio",
            "--port",
            "9100",
        ])
        .unwrap();

        assert!(args.debug);
        assert_eq!(args.iio_prefix, PathBuf::from("/tmp/iio"));
        assert_eq!(args.port, 9100);
    }

    #[test]
    fn test_into_config() {
        let config = Args::try_parse_from([
            "rfsoc-exporter-prometheus",
            "--debug",
            "--log-format",
            "json",
        ])
        .unwrap()
        .into_config();

        assert!(config.debug);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.prometheus.prefix, "rfsoc");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_port() {
        assert!(Args::try_parse_from(["rfsoc-exporter-prometheus", "--port", "http"]).is_err());
    }
}
