//! Core types for the scorecard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw metrics for one run. Ephemeral: only derived scores are persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub type_errors: u32,
    pub lint_violations: u32,
    pub tests_passed: u32,
    pub tests_failed: u32,
    /// Exit code of the test command. Feeds coverage qualification and the
    /// action item for a test run that failed without reporting results.
    pub test_exit_code: i32,
    /// Average line coverage percentage.
    pub coverage: f64,
    pub build_exit_code: i32,
}

/// Component scores, each in [0, 100] rounded to 2 decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub type_safety: f64,
    pub lint_compliance: f64,
    pub test_health: f64,
    pub coverage_level: f64,
    pub build_stability: f64,
}

/// Inputs to the coverage qualification check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageQualification {
    pub test_exit_code: i32,
    pub packages_with_summary: usize,
    pub expected_packages: usize,
}

impl CoverageQualification {
    /// A run qualifies only when the test command succeeded and every
    /// expected package produced a coverage summary.
    pub fn is_qualified(&self) -> bool {
        self.test_exit_code == 0 && self.packages_with_summary == self.expected_packages
    }
}

/// One entry of the bounded scorecard history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub score: f64,
    pub coverage: f64,
    pub type_errors: u32,
    pub lint_violations: u32,
}

/// Action item priority, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

/// A prioritized remediation task derived from a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub priority: Priority,
    pub category: String,
    pub message: String,
}

/// Persisted per-project scorecard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scorecard {
    pub updated_at: Option<DateTime<Utc>>,
    pub scores: ComponentScores,
    pub overall: f64,
    pub coverage: f64,
    pub coverage_floor: f64,
    pub coverage_qualified: bool,
    pub history: Vec<HistoryEntry>,
    pub action_items: Vec<ActionItem>,
}
