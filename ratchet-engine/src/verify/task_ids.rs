//! Task id discovery.

use regex::Regex;

use ratchet_core::errors::ConfigError;

use crate::policy::TaskIdSource;

/// Raw text from each discovery source. Absent sources are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskIdInputs {
    pub cli: Option<String>,
    pub env: Option<String>,
    pub branch: Option<String>,
}

impl TaskIdInputs {
    fn get(&self, source: TaskIdSource) -> Option<&str> {
        match source {
            TaskIdSource::Cli => self.cli.as_deref(),
            TaskIdSource::Env => self.env.as_deref(),
            TaskIdSource::Branch => self.branch.as_deref(),
        }
    }
}

/// Compiled task id pattern.
#[derive(Debug, Clone)]
pub struct TaskIdMatcher {
    regex: Regex,
}

impl TaskIdMatcher {
    /// An invalid pattern is a configuration error.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern).map_err(|e| ConfigError::InvalidValue {
            field: "verify.task_id_pattern".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { regex })
    }

    /// Extract task ids from the configured sources in order.
    ///
    /// Every match in each source's text is collected. Duplicates keep their
    /// first position.
    pub fn discover(&self, sources: &[TaskIdSource], inputs: &TaskIdInputs) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for source in sources {
            let Some(text) = inputs.get(*source) else {
                continue;
            };
            for m in self.regex.find_iter(text) {
                if !ids.iter().any(|id| id == m.as_str()) {
                    ids.push(m.as_str().to_string());
                }
            }
        }
        ids
    }
}

/// Compile `pattern` and discover task ids in one step.
pub fn discover_task_ids(
    sources: &[TaskIdSource],
    pattern: &str,
    inputs: &TaskIdInputs,
) -> Result<Vec<String>, ConfigError> {
    Ok(TaskIdMatcher::new(pattern)?.discover(sources, inputs))
}
