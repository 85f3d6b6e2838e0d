//! Component and overall score computation.
//!
//! type_safety   = 100 − 8 × type_errors
//! lint          = 100 − 4 × lint_violations
//! test_health   = 100 × passed / (passed + failed), or 70 / 20 for an empty run
//! coverage      = average line coverage
//! build         = 100 if the build exited 0, else 0

use ratchet_core::config::ScoreWeights;

use super::types::*;

const TYPE_ERROR_PENALTY: f64 = 8.0;
const LINT_VIOLATION_PENALTY: f64 = 4.0;
const EMPTY_TESTS_CLEAN: f64 = 70.0;
const EMPTY_TESTS_FAILING: f64 = 20.0;

/// Computes component and overall scores from a metrics snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    weights: ScoreWeights,
}

impl Scorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Compute all five component scores.
    pub fn components(&self, metrics: &Metrics) -> ComponentScores {
        ComponentScores {
            type_safety: penalty_score(metrics.type_errors, TYPE_ERROR_PENALTY),
            lint_compliance: penalty_score(metrics.lint_violations, LINT_VIOLATION_PENALTY),
            test_health: test_health(metrics),
            coverage_level: clamp_round(metrics.coverage),
            build_stability: if metrics.build_exit_code == 0 { 100.0 } else { 0.0 },
        }
    }

    /// Weighted sum of the components, clamped and rounded.
    pub fn overall(&self, scores: &ComponentScores) -> f64 {
        let w = &self.weights;
        let sum = scores.type_safety * w.type_safety
            + scores.lint_compliance * w.lint_compliance
            + scores.test_health * w.test_health
            + scores.coverage_level * w.coverage_level
            + scores.build_stability * w.build_stability;
        clamp_round(sum)
    }
}

fn penalty_score(count: u32, penalty: f64) -> f64 {
    if count == 0 {
        return 100.0;
    }
    clamp_round(100.0 - penalty * count as f64)
}

fn test_health(metrics: &Metrics) -> f64 {
    let ran = metrics.tests_passed as u64 + metrics.tests_failed as u64;
    if ran == 0 {
        return if metrics.tests_failed == 0 {
            EMPTY_TESTS_CLEAN
        } else {
            EMPTY_TESTS_FAILING
        };
    }
    clamp_round(100.0 * metrics.tests_passed as f64 / ran as f64)
}

/// Clamp to [0, 100] and round to 2 decimals. NaN maps to 0.
pub fn clamp_round(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    round2(value.clamp(0.0, 100.0))
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean() -> Metrics {
        Metrics {
            tests_passed: 10,
            coverage: 100.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_all_clean_scores_100() {
        let scorer = Scorer::default();
        let scores = scorer.components(&clean());
        assert_eq!(scores.type_safety, 100.0);
        assert_eq!(scores.lint_compliance, 100.0);
        assert_eq!(scores.test_health, 100.0);
        assert_eq!(scores.build_stability, 100.0);
        assert_eq!(scorer.overall(&scores), 100.0);
    }

    #[test]
    fn test_penalties_clamp_at_zero() {
        let scorer = Scorer::default();
        let metrics = Metrics {
            type_errors: 3,
            lint_violations: 40,
            ..clean()
        };
        let scores = scorer.components(&metrics);
        assert_eq!(scores.type_safety, 76.0);
        assert_eq!(scores.lint_compliance, 0.0);
    }

    #[test]
    fn test_empty_test_run_floors() {
        let scorer = Scorer::default();
        let quiet = Metrics::default();
        assert_eq!(scorer.components(&quiet).test_health, 70.0);

        // A failing exit with no parsed counts is not a reported failure.
        let crashed = Metrics {
            test_exit_code: 1,
            ..Default::default()
        };
        assert_eq!(scorer.components(&crashed).test_health, 70.0);
    }

    #[test]
    fn test_ratio_rounds_to_two_decimals() {
        let metrics = Metrics {
            tests_passed: 2,
            tests_failed: 1,
            ..Default::default()
        };
        assert_eq!(Scorer::default().components(&metrics).test_health, 66.67);
    }

    #[test]
    fn test_overall_weights_need_not_sum_to_one() {
        let weights = ScoreWeights {
            type_safety: 1.0,
            lint_compliance: 1.0,
            test_health: 0.0,
            coverage_level: 0.0,
            build_stability: 0.0,
        };
        let scores = Scorer::new(weights).components(&clean());
        // 200 is clamped back into range.
        assert_eq!(Scorer::new(weights).overall(&scores), 100.0);
    }

    #[test]
    fn test_coverage_out_of_range_is_clamped() {
        let metrics = Metrics {
            coverage: 132.456,
            ..clean()
        };
        assert_eq!(Scorer::default().components(&metrics).coverage_level, 100.0);
        assert_eq!(clamp_round(f64::NAN), 0.0);
        assert_eq!(clamp_round(-3.0), 0.0);
        assert_eq!(clamp_round(45.678), 45.68);
    }
}
