//! Error types for usbshare
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::{CommandError, ObserverError};

/// Result type alias for usbshare operations
pub type UsbShareResult<T> = Result<T, UsbShareError>;

/// Main error type for usbshare operations
#[derive(Error, Debug)]
pub enum UsbShareError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Explicitly requested config file does not exist
    #[error("config file not found: {}", .path.display())]
    ConfigNotFound { path: PathBuf },

    /// Config file could not be parsed
    #[error("invalid config file {}: {message}", .file.display())]
    ConfigFile { file: PathBuf, message: String },

    /// A config value is out of range
    #[error("invalid config value for '{key}': {message}")]
    InvalidConfig { key: String, message: String },

    /// Watch setup failed
    #[error(transparent)]
    Observer(#[from] ObserverError),

    /// A device step failed
    #[error(transparent)]
    Command(#[from] CommandError),
}
