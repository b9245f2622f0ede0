//! Error types for keyrecorder.
//!
//! Only the log sink and configuration produce errors in this crate. Event tap
//! failures belong to the platform crates and are handled by the binary.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for keyrecorder operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Log File Errors ===
    /// Failed to open or create the log file.
    #[error("failed to open log file at {path}: {source}")]
    LogOpen {
        /// Path to the log file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Appending a line to the log file failed.
    #[error("error writing to log file {path}: {source}")]
    LogWrite {
        /// Path to the log file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A log line could not be formatted.
    #[error("unable to format log line: {0}")]
    Encoding(#[from] std::fmt::Error),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },
}

/// A specialized Result type for keyrecorder operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}
