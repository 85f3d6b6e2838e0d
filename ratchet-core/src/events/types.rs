//! Event payload types.

use std::path::PathBuf;

/// Payload for `on_run_started`.
#[derive(Debug, Clone)]
pub struct RunStartedEvent {
    pub root: PathBuf,
    pub check_count: usize,
}

/// Payload for `on_run_skipped`.
#[derive(Debug, Clone)]
pub struct RunSkippedEvent {
    pub root: PathBuf,
    pub reason: String,
}

/// Payload for `on_check_completed`.
#[derive(Debug, Clone)]
pub struct CheckCompletedEvent {
    pub name: String,
    pub exit_code: i32,
    pub duration_ms: u64,
}

/// Payload for `on_pattern_promoted`.
#[derive(Debug, Clone)]
pub struct PatternPromotedEvent {
    pub pattern: String,
    pub count: u64,
    pub from: String,
    pub to: String,
}

/// Payload for `on_coverage_floor_changed`.
#[derive(Debug, Clone)]
pub struct CoverageFloorChangedEvent {
    pub previous: f64,
    pub current: f64,
    pub coverage: f64,
}

/// Payload for `on_gate_evaluated`.
#[derive(Debug, Clone)]
pub struct GateEvaluatedEvent {
    pub gate_id: String,
    pub task_id: Option<String>,
    pub status: String,
    pub message: String,
}

/// Payload for `on_verification_complete`.
#[derive(Debug, Clone)]
pub struct VerificationCompleteEvent {
    pub passed: bool,
    pub total: usize,
    pub failed: usize,
    pub waived: usize,
}

/// Payload for `on_error`.
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    pub message: String,
    pub error_code: String,
}
