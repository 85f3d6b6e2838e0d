//! Property tests for the coverage ratchet and pattern promotion.

use chrono::Utc;
use proptest::prelude::*;

use ratchet_core::config::PatternRule;
use ratchet_engine::patterns::{PatternState, PatternTracker};
use ratchet_engine::scorecard::{next_floor, next_scorecard, Metrics, Scorecard, Scorer};

fn metrics_strategy() -> impl Strategy<Value = Metrics> {
    (
        0u32..40,
        0u32..60,
        0u32..500,
        0u32..50,
        -2i32..3,
        -10.0f64..120.0,
        -1i32..2,
    )
        .prop_map(
            |(type_errors, lint_violations, passed, failed, test_exit, coverage, build_exit)| {
                Metrics {
                    type_errors,
                    lint_violations,
                    tests_passed: passed,
                    tests_failed: failed,
                    test_exit_code: test_exit,
                    coverage,
                    build_exit_code: build_exit,
                }
            },
        )
}

proptest! {
    #[test]
    fn floor_never_drops_across_qualified_runs(coverages in prop::collection::vec(0.0f64..100.0, 1..30)) {
        let mut floor = 0.0;
        let mut qualified = false;
        for coverage in coverages {
            let next = next_floor(floor, qualified, coverage, true);
            if qualified {
                prop_assert!(next >= floor);
            }
            floor = next;
            qualified = true;
        }
    }

    #[test]
    fn unqualified_run_keeps_floor(floor in 0.0f64..100.0, prev in any::<bool>(), coverage in 0.0f64..100.0) {
        prop_assert_eq!(next_floor(floor, prev, coverage, false), floor);
    }

    #[test]
    fn scores_stay_in_range(metrics in metrics_strategy(), qualified in any::<bool>()) {
        let scorer = Scorer::default();
        let card = next_scorecard(&Scorecard::default(), &scorer, &metrics, qualified, Utc::now());
        for score in [
            card.scores.type_safety,
            card.scores.lint_compliance,
            card.scores.test_health,
            card.scores.coverage_level,
            card.scores.build_stability,
            card.overall,
            card.coverage,
            card.coverage_floor,
        ] {
            prop_assert!((0.0..=100.0).contains(&score));
        }
    }

    #[test]
    fn recommendation_never_decreases(runs in prop::collection::vec(0usize..4, 1..20)) {
        let mut tracker = PatternTracker::new(vec![PatternRule {
            name: "timeout".to_string(),
            pattern: "ETIMEDOUT".to_string(),
            flags: String::new(),
        }]);
        let mut state = PatternState::default();
        let mut previous = None;
        for (i, hits) in runs.into_iter().enumerate() {
            // Raising the thresholds mid-stream must not demote anything.
            if i == 5 {
                tracker.claude_threshold = 50;
                tracker.lint_threshold = 100;
            }
            let output = "ETIMEDOUT\n".repeat(hits);
            let observation = tracker.observe(&state, &output, Utc::now());
            state = observation.state;
            let current = state.patterns.get("timeout").map(|r| r.recommendation);
            if let (Some(before), Some(after)) = (previous, current) {
                prop_assert!(after >= before);
            }
            if current.is_some() {
                previous = current;
            }
        }
    }
}
