//! Structured error types for hootline-core.
//!
//! Uses `thiserror` for better API surface and error composition.
//! The server binary can still use `anyhow` for convenience, but library
//! consumers get structured, composable errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for hootline-core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// I/O operation failed (config file reads)
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Config file could not be parsed as TOML
    #[error("Invalid config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Configuration is missing or invalid
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for hootline-core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create a config parse error with the offending path
    pub fn config_parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ConfigParse {
            path: path.into(),
            source,
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}
