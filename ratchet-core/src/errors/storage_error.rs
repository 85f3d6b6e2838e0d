//! Persisted state errors.

use super::error_code::{self, RatchetErrorCode};

/// Errors reading or writing the scorecard, pattern, or artifact files.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },

    #[error("Corrupt state file {path}: {message}")]
    Corrupt { path: String, message: String },
}

impl RatchetErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        error_code::STORAGE_ERROR
    }
}
