//! The four named project commands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Shell commands for the four core checks.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CommandConfig {
    pub typecheck: Option<String>,
    pub lint: Option<String>,
    pub test: Option<String>,
    pub build: Option<String>,
}

impl CommandConfig {
    /// Names of the commands, in execution order.
    pub const NAMES: [&'static str; 4] = ["typecheck", "lint", "test", "build"];

    /// Look up a command by name. Blank commands count as missing.
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "typecheck" => self.typecheck.as_deref(),
            "lint" => self.lint.as_deref(),
            "test" => self.test.as_deref(),
            "build" => self.build.as_deref(),
            _ => None,
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Like `get`, but a missing command is a configuration error.
    pub fn require(&self, name: &str) -> Result<&str, ConfigError> {
        self.get(name).ok_or_else(|| ConfigError::MissingCommand {
            name: name.to_string(),
        })
    }

    /// Materialized name → command map used for gate interpolation.
    pub fn named(&self) -> BTreeMap<String, String> {
        Self::NAMES
            .iter()
            .filter_map(|name| self.get(name).map(|c| (name.to_string(), c.to_string())))
            .collect()
    }
}
