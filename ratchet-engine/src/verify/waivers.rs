//! Waivers: time-boxed approvals that turn a failed required gate into `waived`.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use ratchet_core::errors::ConfigError;

const WILDCARD: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waiver {
    /// Gate id, or `*` for any gate.
    #[serde(alias = "gateId")]
    pub gate_id: String,
    /// Restricts the waiver to one task id; `*` or absent means any.
    #[serde(default, alias = "taskId", skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD` (midnight UTC).
    #[serde(default, alias = "expiresAt", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, alias = "approvedBy", skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
}

impl Waiver {
    /// Parsed expiry. `None` when absent or unparseable.
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        let raw = self.expires_at.as_deref()?.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// A waiver applies only while its expiry is in the future. An
    /// unparseable expiry never applies.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match (&self.expires_at, self.expiry()) {
            (None, _) => false,
            (Some(_), Some(expiry)) => now >= expiry,
            (Some(_), None) => true,
        }
    }

    /// Scope check. `*` matches any gate or task; a task-scoped waiver also
    /// matches when no task ids were resolved for the run.
    pub fn covers(&self, gate_id: &str, task_ids: &[String]) -> bool {
        let gate_matches = self.gate_id == WILDCARD || self.gate_id == gate_id;
        let task_matches = match self.task_id.as_deref() {
            None | Some(WILDCARD) => true,
            Some(task) => task_ids.is_empty() || task_ids.iter().any(|id| id == task),
        };
        gate_matches && task_matches
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WaiverFile {
    List(Vec<Waiver>),
    Wrapped { waivers: Vec<Waiver> },
}

/// Read the waivers file. A missing file means no waivers; anything that
/// exists but does not parse is a configuration error.
pub fn load_waivers(path: &Path) -> Result<Vec<Waiver>, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no waivers file");
        return Ok(Vec::new());
    }
    let malformed = |message: String| ConfigError::MalformedWaivers {
        path: path.display().to_string(),
        message,
    };
    let text = std::fs::read_to_string(path).map_err(|e| malformed(e.to_string()))?;
    let file: WaiverFile = serde_json::from_str(&text).map_err(|e| malformed(e.to_string()))?;
    Ok(match file {
        WaiverFile::List(waivers) | WaiverFile::Wrapped { waivers } => waivers,
    })
}

/// First unexpired waiver in file order that covers `gate_id` and the task
/// ids in play. Later, more specific waivers never take precedence.
pub fn resolve_waiver<'a>(
    waivers: &'a [Waiver],
    gate_id: &str,
    task_ids: &[String],
    now: DateTime<Utc>,
) -> Option<&'a Waiver> {
    waivers
        .iter()
        .find(|w| w.covers(gate_id, task_ids) && !w.is_expired(now))
}
