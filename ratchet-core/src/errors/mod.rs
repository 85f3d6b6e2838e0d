//! Error handling for Ratchet.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod gate_error;
pub mod pack_error;
pub mod run_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use error_code::RatchetErrorCode;
pub use gate_error::GateError;
pub use pack_error::PackError;
pub use run_error::RunError;
pub use storage_error::StorageError;
