use std::path::PathBuf;

use compact_str::CompactString;
use thiserror::Error;

use crate::client::ClientError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid configuration for {field}: {message}")]
    ConfigValidationError { field: CompactString, message: CompactString },

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("`{command}` failed with {status}: {stderr}")]
    ExternalToolError {
        command: String,
        status: CompactString,
        stderr: String,
    },

    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to initialize logging: {0}")]
    LoggingError(CompactString),
}

impl AppError {
    /// Create a configuration validation error
    pub fn config_validation_error(
        field: impl Into<CompactString>,
        message: impl Into<CompactString>,
    ) -> Self {
        Self::ConfigValidationError { field: field.into(), message: message.into() }
    }

    /// Create an I/O error tied to the path being touched
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError { path: path.into(), source }
    }
}
