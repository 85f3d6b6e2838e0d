//! Gate evaluation errors.
//!
//! These never escape the evaluator: each one is converted into a failing
//! gate result carrying its message.

use super::error_code::{self, RatchetErrorCode};

/// Errors that can occur while evaluating a single gate.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("Invalid gate definition {id}: {message}")]
    InvalidDefinition { id: String, message: String },

    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Command could not be started: {0}")]
    Command(String),
}

impl RatchetErrorCode for GateError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Command(_) => error_code::COMMAND_ERROR,
            _ => error_code::GATE_FAILED,
        }
    }
}
