//! Coverage ratchet and scorecard reduction.
//!
//! `next = reduce(previous, run)`: the previous scorecard is the only
//! cross-run state, and every run produces a fresh value from it.

use chrono::{DateTime, Utc};

use ratchet_core::constants::{COVERAGE_FLOOR_MARGIN, HISTORY_LIMIT};

use super::scorer::{clamp_round, Scorer};
use super::types::*;

/// Compute the coverage floor after a run.
///
/// Unqualified runs leave the floor untouched. A qualified run following a
/// qualified run can only raise it; a qualified run following an unqualified
/// one re-baselines it at `coverage − 2`.
pub fn next_floor(
    previous_floor: f64,
    previous_qualified: bool,
    coverage: f64,
    qualified: bool,
) -> f64 {
    if !qualified {
        return previous_floor;
    }
    let candidate = clamp_round(coverage - COVERAGE_FLOOR_MARGIN);
    if previous_qualified {
        previous_floor.max(candidate)
    } else {
        candidate
    }
}

/// Reduce the previous scorecard and this run's metrics into the next one.
/// Action items are left empty for the caller to derive.
pub fn next_scorecard(
    previous: &Scorecard,
    scorer: &Scorer,
    metrics: &Metrics,
    qualified: bool,
    now: DateTime<Utc>,
) -> Scorecard {
    let scores = scorer.components(metrics);
    let overall = scorer.overall(&scores);
    let coverage = clamp_round(metrics.coverage);
    let coverage_floor = next_floor(
        previous.coverage_floor,
        previous.coverage_qualified,
        coverage,
        qualified,
    );

    let mut history = previous.history.clone();
    history.push(HistoryEntry {
        timestamp: now,
        score: overall,
        coverage,
        type_errors: metrics.type_errors,
        lint_violations: metrics.lint_violations,
    });
    if history.len() > HISTORY_LIMIT {
        let excess = history.len() - HISTORY_LIMIT;
        history.drain(..excess);
    }

    Scorecard {
        updated_at: Some(now),
        scores,
        overall,
        coverage,
        coverage_floor,
        coverage_qualified: qualified,
        history,
        action_items: Vec::new(),
    }
}
