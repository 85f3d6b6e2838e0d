//! Per-package coverage summary reading.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Aggregate line coverage across the packages that produced a summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    /// Average line coverage percentage over packages with a summary; 0 if none.
    pub average: f64,
    /// Number of packages that actually yielded a summary.
    pub packages_with_summary: usize,
    /// Package dirs whose summary was missing or unreadable.
    pub missing: Vec<String>,
}

/// Reads coverage summaries for a set of package directories.
pub trait CoverageReader: Send + Sync {
    fn read(&self, root: &Path, package_dirs: &[String], summary_path: &str) -> CoverageSummary;
}

/// Reads Istanbul `json-summary` files (`total.lines.pct`) from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCoverageReader;

impl FsCoverageReader {
    fn line_pct(path: &Path) -> Option<f64> {
        let content = std::fs::read_to_string(path).ok()?;
        let value: serde_json::Value = serde_json::from_str(&content).ok()?;
        value
            .get("total")?
            .get("lines")?
            .get("pct")?
            .as_f64()
    }
}

impl CoverageReader for FsCoverageReader {
    fn read(&self, root: &Path, package_dirs: &[String], summary_path: &str) -> CoverageSummary {
        let mut total = 0.0;
        let mut summary = CoverageSummary::default();

        for dir in package_dirs {
            let path = root.join(dir).join(summary_path);
            match Self::line_pct(&path) {
                Some(pct) => {
                    total += pct;
                    summary.packages_with_summary += 1;
                }
                None => {
                    tracing::debug!(package = %dir, path = %path.display(), "no coverage summary");
                    summary.missing.push(dir.clone());
                }
            }
        }

        if summary.packages_with_summary > 0 {
            summary.average = total / summary.packages_with_summary as f64;
        }
        summary
    }
}
