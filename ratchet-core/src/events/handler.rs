//! RatchetEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for handling Ratchet events.
///
/// All methods have no-op default implementations, so handlers only need
/// to override the events they care about.
pub trait RatchetEventHandler: Send + Sync {
    // ---- Run lifecycle ----
    fn on_run_started(&self, _event: &RunStartedEvent) {}
    fn on_run_skipped(&self, _event: &RunSkippedEvent) {}
    fn on_check_completed(&self, _event: &CheckCompletedEvent) {}

    // ---- Cross-run state ----
    fn on_pattern_promoted(&self, _event: &PatternPromotedEvent) {}
    fn on_coverage_floor_changed(&self, _event: &CoverageFloorChangedEvent) {}

    // ---- Verification ----
    fn on_gate_evaluated(&self, _event: &GateEvaluatedEvent) {}
    fn on_verification_complete(&self, _event: &VerificationCompleteEvent) {}

    // ---- Errors ----
    fn on_error(&self, _event: &ErrorEvent) {}
}
