use std::path::PathBuf;

use thiserror::Error;

/// Common error type for RFSoC IIO components.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to list sensor directory '{}': {source}", path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using the crate's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a single sensor value could not be read.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("sensor file '{}' unreadable: {source}", path.display())]
    Missing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sensor file '{}' holds no numeric value", path.display())]
    NoValue { path: PathBuf },
}
