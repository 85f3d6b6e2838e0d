//! Scorecard component weights.

use serde::{Deserialize, Serialize};

/// User-overridable weights. Unset fields fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WeightConfig {
    pub type_safety: Option<f64>,
    pub lint_compliance: Option<f64>,
    pub test_health: Option<f64>,
    pub coverage_level: Option<f64>,
    pub build_stability: Option<f64>,
}

/// Fully resolved component weights. Not required to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub type_safety: f64,
    pub lint_compliance: f64,
    pub test_health: f64,
    pub coverage_level: f64,
    pub build_stability: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            type_safety: 0.25,
            lint_compliance: 0.15,
            test_health: 0.25,
            coverage_level: 0.20,
            build_stability: 0.15,
        }
    }
}

impl WeightConfig {
    /// Fill unset weights from the defaults.
    pub fn resolve(&self) -> ScoreWeights {
        let d = ScoreWeights::default();
        ScoreWeights {
            type_safety: self.type_safety.unwrap_or(d.type_safety),
            lint_compliance: self.lint_compliance.unwrap_or(d.lint_compliance),
            test_health: self.test_health.unwrap_or(d.test_health),
            coverage_level: self.coverage_level.unwrap_or(d.coverage_level),
            build_stability: self.build_stability.unwrap_or(d.build_stability),
        }
    }

    pub(crate) fn entries(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("weights.type_safety", self.type_safety),
            ("weights.lint_compliance", self.lint_compliance),
            ("weights.test_health", self.test_health),
            ("weights.coverage_level", self.coverage_level),
            ("weights.build_stability", self.build_stability),
        ]
    }
}
