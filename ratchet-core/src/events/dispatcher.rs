//! EventDispatcher: synchronous event dispatch with zero overhead when empty.

use std::sync::Arc;

use super::handler::RatchetEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
#[derive(Default, Clone)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn RatchetEventHandler>>,
}

impl EventDispatcher {
    /// Create a new empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn RatchetEventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// A panicking handler does not prevent later handlers from receiving the event.
    fn emit<F: Fn(&dyn RatchetEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!("event handler panicked; continuing with remaining handlers");
            }
        }
    }

    // ---- Run lifecycle ----
    pub fn emit_run_started(&self, event: &RunStartedEvent) {
        self.emit(|h| h.on_run_started(event));
    }

    pub fn emit_run_skipped(&self, event: &RunSkippedEvent) {
        self.emit(|h| h.on_run_skipped(event));
    }

    pub fn emit_check_completed(&self, event: &CheckCompletedEvent) {
        self.emit(|h| h.on_check_completed(event));
    }

    // ---- Cross-run state ----
    pub fn emit_pattern_promoted(&self, event: &PatternPromotedEvent) {
        self.emit(|h| h.on_pattern_promoted(event));
    }

    pub fn emit_coverage_floor_changed(&self, event: &CoverageFloorChangedEvent) {
        self.emit(|h| h.on_coverage_floor_changed(event));
    }

    // ---- Verification ----
    pub fn emit_gate_evaluated(&self, event: &GateEvaluatedEvent) {
        self.emit(|h| h.on_gate_evaluated(event));
    }

    pub fn emit_verification_complete(&self, event: &VerificationCompleteEvent) {
        self.emit(|h| h.on_verification_complete(event));
    }

    // ---- Errors ----
    pub fn emit_error(&self, event: &ErrorEvent) {
        self.emit(|h| h.on_error(event));
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
