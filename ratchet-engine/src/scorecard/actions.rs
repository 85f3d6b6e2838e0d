//! Prioritized action items derived from a run.

use crate::patterns::{Promotion, Recommendation};

use super::types::*;

/// Everything the action-item derivation looks at.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    pub metrics: &'a Metrics,
    /// Scorecard as it was before this run.
    pub previous: &'a Scorecard,
    pub qualification: CoverageQualification,
    pub promotions: &'a [Promotion],
}

/// Derive action items, most urgent first. A clean run yields none.
pub fn derive_action_items(ctx: &ActionContext<'_>) -> Vec<ActionItem> {
    let m = ctx.metrics;
    let mut items = Vec::new();

    if m.build_exit_code != 0 {
        items.push(item(
            Priority::Critical,
            "build",
            format!(
                "Build is unstable: build command exited with code {}",
                m.build_exit_code
            ),
        ));
    }

    if m.type_errors > 0 {
        items.push(item(
            Priority::High,
            "type_safety",
            format!("Fix {} type error{}", m.type_errors, plural(m.type_errors)),
        ));
    }

    if m.tests_failed > 0 {
        items.push(item(
            Priority::High,
            "tests",
            format!("Fix {} failing test{}", m.tests_failed, plural(m.tests_failed)),
        ));
    } else if m.tests_passed == 0 {
        if m.test_exit_code != 0 {
            items.push(item(
                Priority::High,
                "tests",
                format!(
                    "Test command failed without reporting results (exit code {})",
                    m.test_exit_code
                ),
            ));
        } else {
            items.push(item(
                Priority::Low,
                "tests",
                "No tests were detected in the test output".to_string(),
            ));
        }
    }

    if m.lint_violations > 0 {
        items.push(item(
            Priority::Medium,
            "lint",
            format!(
                "Resolve {} lint violation{}",
                m.lint_violations,
                plural(m.lint_violations)
            ),
        ));
    }

    let q = ctx.qualification;
    if !q.is_qualified() {
        let message = if q.test_exit_code != 0 {
            format!(
                "Coverage not qualified: test command exited with code {}",
                q.test_exit_code
            )
        } else {
            format!(
                "Coverage not qualified: {} of {} packages produced a coverage summary",
                q.packages_with_summary, q.expected_packages
            )
        };
        items.push(item(Priority::Medium, "coverage", message));
    } else if ctx.previous.coverage_qualified && m.coverage < ctx.previous.coverage_floor {
        items.push(item(
            Priority::High,
            "coverage",
            format!(
                "Coverage {:.2}% is below the floor of {:.2}%",
                m.coverage, ctx.previous.coverage_floor
            ),
        ));
    }

    for promotion in ctx.promotions {
        let (priority, rule) = match promotion.to {
            Recommendation::LintRule => (Priority::Medium, "a lint rule"),
            Recommendation::ClaudeRule => (Priority::Low, "an agent rule"),
            Recommendation::None => continue,
        };
        items.push(item(
            priority,
            "patterns",
            format!(
                "Pattern '{}' seen {} times: add {rule}",
                promotion.pattern, promotion.count
            ),
        ));
    }

    items.sort_by_key(|i| i.priority);
    items
}

fn item(priority: Priority, category: &str, message: String) -> ActionItem {
    ActionItem {
        priority,
        category: category.to_string(),
        message,
    }
}

fn plural(n: u32) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
