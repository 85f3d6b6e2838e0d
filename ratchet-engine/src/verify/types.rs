//! Verification result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::waivers::Waiver;
use crate::policy::PackRef;

/// Outcome of one gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateStatus {
    Pass,
    Fail,
    Waived,
}

impl GateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Waived => "waived",
        }
    }
}

impl std::fmt::Display for GateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Captured process output, truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateOutput {
    pub command: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// One gate result. Task-scoped gates produce one per task id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateResult {
    pub gate_id: String,
    pub gate_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub required: bool,
    pub status: GateStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<GateOutput>,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiver: Option<Waiver>,
}

impl GateResult {
    /// A required gate that failed without a waiver.
    pub fn is_blocking(&self) -> bool {
        self.required && self.status == GateStatus::Fail
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateCounts {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub waived: usize,
}

impl GateCounts {
    pub fn tally(results: &[GateResult]) -> Self {
        results.iter().fold(
            Self {
                total: results.len(),
                ..Self::default()
            },
            |mut counts, r| {
                match r.status {
                    GateStatus::Pass => counts.passed += 1,
                    GateStatus::Fail => counts.failed += 1,
                    GateStatus::Waived => counts.waived += 1,
                }
                counts
            },
        )
    }
}

/// The verification artifact persisted to `verification.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub run_at: DateTime<Utc>,
    pub task_ids: Vec<String>,
    pub policy_packs: Vec<PackRef>,
    pub gate_counts: GateCounts,
    pub results: Vec<GateResult>,
    pub passed: bool,
    /// Why verification failed, one line per blocking problem.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<String>,
}

impl VerificationReport {
    /// Assemble the report. Verification passes iff no required gate failed
    /// and, when a task id is required, at least one was resolved.
    pub fn from_results(
        run_at: DateTime<Utc>,
        task_ids: Vec<String>,
        policy_packs: Vec<PackRef>,
        results: Vec<GateResult>,
        require_task_id: bool,
    ) -> Self {
        let mut problems = Vec::new();
        if require_task_id && task_ids.is_empty() {
            problems.push("a task id is required but none was resolved".to_string());
        }
        for result in results.iter().filter(|r| r.is_blocking()) {
            match &result.task_id {
                Some(task) => problems.push(format!(
                    "required gate {} failed for {task}: {}",
                    result.gate_id, result.message
                )),
                None => problems.push(format!(
                    "required gate {} failed: {}",
                    result.gate_id, result.message
                )),
            }
        }

        Self {
            run_at,
            task_ids,
            policy_packs,
            gate_counts: GateCounts::tally(&results),
            results,
            passed: problems.is_empty(),
            problems,
        }
    }

    pub fn exit_code(&self) -> i32 {
        if self.passed {
            0
        } else {
            1
        }
    }
}
