//! Top-level Ratchet configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{CommandConfig, PatternConfig, WeightConfig};
use crate::constants::{CONFIG_FILE_NAME, DEFAULT_COVERAGE_SUMMARY, DEFAULT_QUALITY_DIR};
use crate::errors::ConfigError;

/// Top-level project configuration (`ratchet.toml`).
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`RATCHET_*`)
/// 3. Project config (`ratchet.toml` in project root)
/// 4. Compiled defaults
///
/// The `verify` block is kept as an untyped document: it is only one layer of
/// the effective verify configuration, which is built by merging it over the
/// builtin defaults and the configured policy packs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RatchetConfig {
    pub quality_dir: Option<String>,
    pub package_dirs: Vec<String>,
    pub coverage_summary: Option<String>,
    pub expected_coverage_packages: Option<usize>,
    pub policy_packs: Vec<String>,
    pub commands: CommandConfig,
    pub weights: WeightConfig,
    pub patterns: PatternConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify: Option<serde_json::Value>,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub quality_dir: Option<String>,
    pub verify_enabled: Option<bool>,
}

impl RatchetConfig {
    /// Load configuration with layered resolution and validate the result.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(CONFIG_FILE_NAME);
        if project_config_path.exists() {
            config = Self::read_toml_file(&project_config_path)?;
        } else {
            tracing::debug!(path = %project_config_path.display(), "no project config, using defaults");
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    fn read_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration. Every failure here is fatal and must be
    /// reported before any check runs.
    pub fn validate(config: &RatchetConfig) -> Result<(), ConfigError> {
        for name in CommandConfig::NAMES {
            config.commands.require(name)?;
        }
        if config.package_dirs.is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "package_dirs".to_string(),
                message: "at least one package directory is required".to_string(),
            });
        }
        if config.expected_coverage_packages == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "expected_coverage_packages".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        for (field, weight) in config.weights.entries() {
            if let Some(w) = weight {
                if !w.is_finite() || w < 0.0 {
                    return Err(ConfigError::InvalidValue {
                        field: field.to_string(),
                        message: "must be a non-negative number".to_string(),
                    });
                }
            }
        }
        if config.patterns.effective_claude_threshold() == 0
            || config.patterns.effective_lint_threshold() == 0
        {
            return Err(ConfigError::ValidationFailed {
                field: "patterns".to_string(),
                message: "thresholds must be greater than 0".to_string(),
            });
        }
        if let Some(verify) = &config.verify {
            if !verify.is_object() {
                return Err(ConfigError::InvalidValue {
                    field: "verify".to_string(),
                    message: "must be a table".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(config: &mut RatchetConfig) {
        if let Ok(val) = std::env::var("RATCHET_QUALITY_DIR") {
            if !val.is_empty() {
                config.quality_dir = Some(val);
            }
        }
        if let Ok(val) = std::env::var("RATCHET_VERIFY_ENABLED") {
            if let Ok(v) = val.parse::<bool>() {
                config.set_verify_field("enabled", serde_json::Value::Bool(v));
            }
        }
        if let Ok(val) = std::env::var("RATCHET_TASK_ID_ENV") {
            if !val.is_empty() {
                config.set_verify_field("task_id_env", serde_json::Value::String(val));
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut RatchetConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.quality_dir {
            config.quality_dir = Some(v.clone());
        }
        if let Some(v) = cli.verify_enabled {
            config.set_verify_field("enabled", serde_json::Value::Bool(v));
        }
    }

    /// Set a scalar on the repo-local verify block, creating it if needed.
    /// A non-table verify block is left for `validate` to reject.
    fn set_verify_field(&mut self, key: &str, value: serde_json::Value) {
        let verify = self
            .verify
            .get_or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
        if let Some(map) = verify.as_object_mut() {
            map.insert(key.to_string(), value);
        }
    }

    /// Returns the effective quality dir, relative to the project root.
    pub fn effective_quality_dir(&self) -> &str {
        self.quality_dir.as_deref().unwrap_or(DEFAULT_QUALITY_DIR)
    }

    /// Absolute quality dir for a project rooted at `root`.
    pub fn quality_dir_path(&self, root: &Path) -> PathBuf {
        root.join(self.effective_quality_dir())
    }

    /// Returns the per-package coverage summary path.
    pub fn effective_coverage_summary(&self) -> &str {
        self.coverage_summary
            .as_deref()
            .unwrap_or(DEFAULT_COVERAGE_SUMMARY)
    }

    /// Number of packages that must produce a coverage summary for a run to
    /// qualify. Defaults to the number of configured package dirs.
    pub fn effective_expected_packages(&self) -> usize {
        self.expected_coverage_packages
            .unwrap_or(self.package_dirs.len())
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
