//! Configuration errors.

use super::error_code::{self, RatchetErrorCode};

/// Errors that can occur during configuration loading and validation.
/// All of them are fatal and abort before any check runs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Missing required command: commands.{name}")]
    MissingCommand { name: String },

    #[error("Invalid config value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Malformed waivers file {path}: {message}")]
    MalformedWaivers { path: String, message: String },
}

impl RatchetErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }
}
