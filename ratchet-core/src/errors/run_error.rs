//! Top-level run errors.

use super::error_code::{self, RatchetErrorCode};
use super::{ConfigError, PackError, StorageError};

/// Errors that abort a scoring or verification run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Policy pack error: {0}")]
    Pack(#[from] PackError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Command {command} could not be started: {message}")]
    Command { command: String, message: String },
}

impl RatchetErrorCode for RunError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Pack(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Command { .. } => error_code::COMMAND_ERROR,
        }
    }
}
