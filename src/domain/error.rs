//! Domain error types

use thiserror::Error;

/// Error when parsing or bounding a request timeout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeoutError {
    #[error("Invalid timeout: \"{0}\". Expected seconds or minutes (e.g., 45s, 2m, 1m30s)")]
    Format(String),

    #[error("Timeout {0} is out of range: allowed 1s to 10m")]
    OutOfRange(String),
}

/// Error when an unknown ink color is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid ink color: \"{input}\". Valid colors are: black, blue")]
pub struct InvalidInkColorError {
    pub input: String,
}

/// Error when an unknown camera facing mode is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid facing mode: \"{input}\". Valid modes are: user, environment")]
pub struct InvalidFacingModeError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
