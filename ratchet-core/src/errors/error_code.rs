//! RatchetErrorCode trait for machine-readable error codes.

/// Every error enum implements this to expose a stable code string that
/// callers (CLI wrappers, CI annotations) can match on.
pub trait RatchetErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const PACK_NOT_FOUND: &str = "PACK_NOT_FOUND";
pub const PACK_INVALID: &str = "PACK_INVALID";
pub const GATE_FAILED: &str = "GATE_FAILED";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const COMMAND_ERROR: &str = "COMMAND_ERROR";
