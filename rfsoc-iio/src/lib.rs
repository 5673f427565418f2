//! RFSoC IIO Library
//!
//! This crate reads calibrated sensor values from a Linux IIO device directory
//! (typically `/sys/bus/iio/devices/iio:device0`):
//!
//! - [`reader`] - Single-value attribute file reader
//! - [`calibration`] - `scale * (raw + offset) / 1000` calibration of a channel
//! - [`discovery`] - Directory scan producing one [`SensorIdentity`] per channel
//! - [`config`] - Logging configuration
//! - [`error`] - Error types

pub mod calibration;
pub mod config;
pub mod discovery;
pub mod error;
pub mod reader;

// Re-export commonly used types at the crate root
pub use calibration::{Calibration, SensorReading, calibrated_value};
pub use config::{LogFormat, LoggingConfig};
pub use discovery::{SensorIdentity, discover_sensors};
pub use error::{Error, ReadError, Result};
pub use reader::{read_value, read_value_or_default, value_or_default};

/// Initialize tracing with the given configuration.
///
/// `RUST_LOG` takes precedence over `config.level` when set.
///
/// # Example
///
/// ```ignore
/// use rfsoc_iio::{LoggingConfig, LogFormat, init_tracing};
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     format: LogFormat::Json,
/// };
/// init_tracing(&config)?;
/// ```
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
    }

    Ok(())
}
