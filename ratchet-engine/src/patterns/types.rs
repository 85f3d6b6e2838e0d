//! Pattern state types.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Remediation recommendation tier, ordered from weakest to strictest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    #[default]
    None,
    ClaudeRule,
    LintRule,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ClaudeRule => "claude_rule",
            Self::LintRule => "lint_rule",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted record for one pattern. `count` is cumulative and never reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternRecord {
    pub count: u64,
    pub last_seen: Option<DateTime<Utc>>,
    pub recommendation: Recommendation,
}

/// Persisted pattern state for a project, keyed by pattern name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternState {
    pub updated_at: Option<DateTime<Utc>>,
    pub patterns: BTreeMap<String, PatternRecord>,
}

/// A recommendation transition caused by this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    pub pattern: String,
    pub count: u64,
    pub from: Recommendation,
    pub to: Recommendation,
}

/// Result of folding one run's output into the pattern state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatternObservation {
    pub state: PatternState,
    /// Matches per pattern this run (patterns with zero matches omitted).
    pub matches: BTreeMap<String, u64>,
    pub promotions: Vec<Promotion>,
    /// Rules skipped because their expression did not compile.
    pub skipped: Vec<String>,
}
