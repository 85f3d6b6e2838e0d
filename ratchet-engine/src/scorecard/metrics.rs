//! Output classification: turns raw check output into metric counts.
//!
//! Parsing is tool-specific and sits behind `MetricsClassifier`.

use regex::Regex;
use serde::{Deserialize, Serialize};

use ratchet_core::traits::CommandOutput;

use super::types::Metrics;

/// Output of the four core checks for one run.
#[derive(Debug, Clone, Default)]
pub struct CheckRuns {
    pub typecheck: CommandOutput,
    pub lint: CommandOutput,
    pub test: CommandOutput,
    pub build: CommandOutput,
}

impl CheckRuns {
    /// Combined output of every executed check, in execution order.
    pub fn combined_output(&self) -> String {
        [&self.typecheck, &self.lint, &self.test, &self.build]
            .iter()
            .map(|o| o.combined())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Counts extracted from check output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputCounts {
    pub type_errors: u32,
    pub lint_violations: u32,
    pub tests_passed: u32,
    pub tests_failed: u32,
}

impl OutputCounts {
    /// Combine with coverage and exit codes into a full metrics snapshot.
    pub fn into_metrics(self, runs: &CheckRuns, coverage: f64) -> Metrics {
        Metrics {
            type_errors: self.type_errors,
            lint_violations: self.lint_violations,
            tests_passed: self.tests_passed,
            tests_failed: self.tests_failed,
            test_exit_code: runs.test.exit_code,
            coverage,
            build_exit_code: runs.build.exit_code,
        }
    }
}

/// Pluggable classification strategy.
pub trait MetricsClassifier: Send + Sync {
    fn classify(&self, runs: &CheckRuns) -> OutputCounts;
}

/// Default heuristics for TypeScript, ESLint, and Jest/Vitest/Mocha output.
///
/// A check that exits non-zero without any recognizable count is counted as
/// one error, so unrecognized failures still depress the score.
#[derive(Debug, Clone)]
pub struct RegexClassifier {
    pub type_error: String,
    pub lint_summary: String,
    pub lint_line: String,
    pub tests_line: String,
    pub passed: String,
    pub failed: String,
}

impl Default for RegexClassifier {
    fn default() -> Self {
        Self {
            type_error: r"error TS\d+".to_string(),
            lint_summary: r"(\d+) problems?".to_string(),
            lint_line: r"(?m)^\s*\d+:\d+\s+(?:error|warning)\s".to_string(),
            tests_line: r"(?m)^\s*Tests:?\s+(.*)$".to_string(),
            passed: r"(\d+) (?:passed|passing)".to_string(),
            failed: r"(\d+) (?:failed|failing)".to_string(),
        }
    }
}

impl RegexClassifier {
    fn compile(pattern: &str) -> Option<Regex> {
        match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(pattern, error = %e, "invalid classifier pattern, ignoring");
                None
            }
        }
    }

    fn count_matches(pattern: &str, text: &str) -> u32 {
        Self::compile(pattern).map_or(0, |re| re.find_iter(text).count() as u32)
    }

    fn sum_captures(re: &Regex, text: &str) -> u32 {
        re.captures_iter(text)
            .filter_map(|c| c.get(1)?.as_str().parse::<u32>().ok())
            .sum()
    }

    fn type_errors(&self, output: &CommandOutput) -> u32 {
        let found = Self::count_matches(&self.type_error, &output.combined());
        at_least_one_on_failure(found, output)
    }

    fn lint_violations(&self, output: &CommandOutput) -> u32 {
        let text = output.combined();
        let summary = Self::compile(&self.lint_summary)
            .and_then(|re| re.captures_iter(&text).last())
            .and_then(|c| c.get(1)?.as_str().parse::<u32>().ok());
        let found = match summary {
            Some(n) => n,
            None => Self::count_matches(&self.lint_line, &text),
        };
        at_least_one_on_failure(found, output)
    }

    fn tests(&self, output: &CommandOutput) -> (u32, u32) {
        let text = output.combined();
        let (Some(passed), Some(failed)) = (Self::compile(&self.passed), Self::compile(&self.failed))
        else {
            return (0, 0);
        };

        // Prefer the "Tests:" summary line so "Test Files" counts are not added in.
        let summary_lines: Vec<String> = Self::compile(&self.tests_line)
            .map(|re| {
                re.captures_iter(&text)
                    .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
                    .collect()
            })
            .unwrap_or_default();

        if summary_lines.is_empty() {
            (
                Self::sum_captures(&passed, &text),
                Self::sum_captures(&failed, &text),
            )
        } else {
            summary_lines.iter().fold((0, 0), |(p, f), line| {
                (
                    p + Self::sum_captures(&passed, line),
                    f + Self::sum_captures(&failed, line),
                )
            })
        }
    }
}

fn at_least_one_on_failure(found: u32, output: &CommandOutput) -> u32 {
    if found == 0 && !output.success() {
        1
    } else {
        found
    }
}

impl MetricsClassifier for RegexClassifier {
    fn classify(&self, runs: &CheckRuns) -> OutputCounts {
        let (tests_passed, tests_failed) = self.tests(&runs.test);
        OutputCounts {
            type_errors: self.type_errors(&runs.typecheck),
            lint_violations: self.lint_violations(&runs.lint),
            tests_passed,
            tests_failed,
        }
    }
}
