//! Failure-pattern tracking configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CLAUDE_RULE_THRESHOLD, DEFAULT_LINT_RULE_THRESHOLD};

/// A single pattern rule: a name, a regex body, and optional flags.
///
/// Flags are single letters: `i` (case-insensitive), `m` (multi-line),
/// `s` (dot matches newline), `x` (ignore whitespace). Unknown letters are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    pub name: String,
    pub pattern: String,
    #[serde(default)]
    pub flags: String,
}

/// Configuration for the pattern tracker.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PatternConfig {
    /// Cumulative count at which a pattern becomes an agent-rule recommendation. Default: 3.
    pub claude_threshold: Option<u64>,
    /// Cumulative count at which a pattern becomes a lint-rule recommendation. Default: 5.
    pub lint_threshold: Option<u64>,
    pub rules: Vec<PatternRule>,
}

impl PatternConfig {
    pub fn effective_claude_threshold(&self) -> u64 {
        self.claude_threshold.unwrap_or(DEFAULT_CLAUDE_RULE_THRESHOLD)
    }

    pub fn effective_lint_threshold(&self) -> u64 {
        self.lint_threshold.unwrap_or(DEFAULT_LINT_RULE_THRESHOLD)
    }
}
