//! Policy pack errors.

use super::error_code::{self, RatchetErrorCode};

/// Errors raised while resolving or loading a policy pack.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("Policy pack not found: {reference}")]
    NotFound { reference: String },

    #[error("Unknown builtin policy pack: {name}")]
    UnknownBuiltin { name: String },

    #[error("Policy pack {reference} could not be read: {message}")]
    Unreadable { reference: String, message: String },

    #[error("Policy pack {reference} is not valid: {message}")]
    Invalid { reference: String, message: String },
}

impl RatchetErrorCode for PackError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } | Self::UnknownBuiltin { .. } => error_code::PACK_NOT_FOUND,
            Self::Unreadable { .. } | Self::Invalid { .. } => error_code::PACK_INVALID,
        }
    }
}
