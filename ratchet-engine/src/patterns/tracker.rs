//! Cumulative pattern counting with threshold-based promotion.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};

use ratchet_core::config::{PatternConfig, PatternRule};
use ratchet_core::constants::{DEFAULT_CLAUDE_RULE_THRESHOLD, DEFAULT_LINT_RULE_THRESHOLD};

use super::types::*;

/// Folds check output into the persisted pattern state.
#[derive(Debug, Clone)]
pub struct PatternTracker {
    pub claude_threshold: u64,
    pub lint_threshold: u64,
    rules: Vec<PatternRule>,
}

impl PatternTracker {
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self {
            claude_threshold: DEFAULT_CLAUDE_RULE_THRESHOLD,
            lint_threshold: DEFAULT_LINT_RULE_THRESHOLD,
            rules,
        }
    }

    pub fn from_config(config: &PatternConfig) -> Self {
        Self {
            claude_threshold: config.effective_claude_threshold(),
            lint_threshold: config.effective_lint_threshold(),
            rules: config.rules.clone(),
        }
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Recommendation for a cumulative count.
    pub fn recommend(&self, count: u64) -> Recommendation {
        if count >= self.lint_threshold {
            Recommendation::LintRule
        } else if count >= self.claude_threshold {
            Recommendation::ClaudeRule
        } else {
            Recommendation::None
        }
    }

    /// Count matches of every rule in `output`. Rules whose expression does
    /// not compile are reported in the second list and count as zero.
    pub fn count_matches(&self, output: &str) -> (BTreeMap<String, u64>, Vec<String>) {
        let mut counts = BTreeMap::new();
        let mut skipped = Vec::new();

        for rule in &self.rules {
            let re = match compile_rule(rule) {
                Ok(re) => re,
                Err(e) => {
                    tracing::warn!(pattern = %rule.name, error = %e, "skipping malformed pattern rule");
                    skipped.push(rule.name.clone());
                    continue;
                }
            };
            let n = re.find_iter(output).count() as u64;
            if n > 0 {
                *counts.entry(rule.name.clone()).or_insert(0) += n;
            }
        }

        (counts, skipped)
    }

    /// Reduce the previous state and this run's combined output into the next state.
    ///
    /// Only patterns matched this run are touched. A promotion is reported
    /// only when the stored recommendation changes, never on later runs that
    /// stay in the same tier.
    pub fn observe(
        &self,
        previous: &PatternState,
        output: &str,
        now: DateTime<Utc>,
    ) -> PatternObservation {
        let (matches, skipped) = self.count_matches(output);
        let mut state = previous.clone();
        let mut promotions = Vec::new();

        for (name, n) in &matches {
            let record = state.patterns.entry(name.clone()).or_default();
            let before = record.recommendation;
            record.count = record.count.saturating_add(*n);
            record.last_seen = Some(now);
            record.recommendation = before.max(self.recommend(record.count));

            if record.recommendation != before {
                tracing::info!(
                    pattern = %name,
                    count = record.count,
                    from = %before,
                    to = %record.recommendation,
                    "pattern promoted"
                );
                promotions.push(Promotion {
                    pattern: name.clone(),
                    count: record.count,
                    from: before,
                    to: record.recommendation,
                });
            }
        }

        state.updated_at = Some(now);
        PatternObservation {
            state,
            matches,
            promotions,
            skipped,
        }
    }
}

fn compile_rule(rule: &PatternRule) -> Result<Regex, regex::Error> {
    build_regex(&rule.pattern, &rule.flags)
}

/// Compile `pattern` with single-letter flags: `i`, `m`, `s`, `x`.
/// Other letters (including JavaScript's `g`) are ignored.
pub fn build_regex(pattern: &str, flags: &str) -> Result<Regex, regex::Error> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            _ => {}
        }
    }
    builder.build()
}
