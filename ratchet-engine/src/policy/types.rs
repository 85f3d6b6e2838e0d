//! Typed verify configuration and gate definitions.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use ratchet_core::errors::ConfigError;

/// Where task ids are discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskIdSource {
    Cli,
    Env,
    Branch,
}

impl TaskIdSource {
    pub fn defaults() -> Vec<TaskIdSource> {
        vec![Self::Cli, Self::Env, Self::Branch]
    }
}

/// A gate's type-specific payload. Closed set: anything else is `Unsupported`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateKind {
    Command {
        command: String,
    },
    CustomScript {
        command: String,
    },
    FileExists {
        paths: Vec<String>,
    },
    Regex {
        file: String,
        pattern: String,
        flags: String,
        min_matches: usize,
    },
    JsonSchema {
        schema: String,
        data: String,
    },
    /// A `type` outside the closed set. Always fails.
    Unsupported { type_name: String },
    /// A known `type` whose fields did not parse. Always fails.
    Malformed { type_name: String, message: String },
}

impl GateKind {
    pub fn type_name(&self) -> &str {
        match self {
            Self::Command { .. } => "command",
            Self::CustomScript { .. } => "custom_script",
            Self::FileExists { .. } => "file_exists",
            Self::Regex { .. } => "regex",
            Self::JsonSchema { .. } => "json_schema",
            Self::Unsupported { type_name } | Self::Malformed { type_name, .. } => type_name,
        }
    }
}

/// A declarative verification gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateSpec {
    pub id: String,
    pub description: Option<String>,
    pub required: bool,
    pub enabled: bool,
    pub for_each_task_id: bool,
    pub kind: GateKind,
}

impl fmt::Display for GateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.kind.type_name())
    }
}

#[derive(Deserialize)]
struct CommonFields {
    id: String,
    #[serde(rename = "type", default)]
    type_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default = "default_true")]
    required: bool,
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default)]
    for_each_task_id: bool,
}

#[derive(Deserialize)]
struct CommandFields {
    #[serde(alias = "script")]
    command: String,
}

#[derive(Deserialize)]
struct FileExistsFields {
    paths: Vec<String>,
}

#[derive(Deserialize)]
struct RegexFields {
    file: String,
    pattern: String,
    #[serde(default)]
    flags: String,
    #[serde(default = "default_min_matches")]
    min_matches: usize,
}

#[derive(Deserialize)]
struct JsonSchemaFields {
    schema: String,
    data: String,
}

fn default_true() -> bool {
    true
}

fn default_min_matches() -> usize {
    1
}

impl GateSpec {
    /// Build a typed gate from one merged gate record.
    ///
    /// A missing or non-string `id` is a configuration error. Missing
    /// type-specific fields are not: the gate becomes `Malformed` and fails
    /// at evaluation time like any other broken gate.
    pub fn from_value(index: usize, value: &serde_json::Value) -> Result<Self, ConfigError> {
        let common: CommonFields =
            serde_json::from_value(value.clone()).map_err(|e| ConfigError::InvalidValue {
                field: format!("verify.gates[{index}]"),
                message: e.to_string(),
            })?;

        let type_name = common.type_name.unwrap_or_default();
        let kind = match type_name.as_str() {
            "command" => typed::<CommandFields>(&type_name, value)
                .map(|f| GateKind::Command { command: f.command }),
            "custom_script" => typed::<CommandFields>(&type_name, value)
                .map(|f| GateKind::CustomScript { command: f.command }),
            "file_exists" => typed::<FileExistsFields>(&type_name, value)
                .map(|f| GateKind::FileExists { paths: f.paths }),
            "regex" => typed::<RegexFields>(&type_name, value).map(|f| GateKind::Regex {
                file: f.file,
                pattern: f.pattern,
                flags: f.flags,
                min_matches: f.min_matches,
            }),
            "json_schema" => typed::<JsonSchemaFields>(&type_name, value).map(|f| {
                GateKind::JsonSchema {
                    schema: f.schema,
                    data: f.data,
                }
            }),
            _ => Ok(GateKind::Unsupported {
                type_name: type_name.clone(),
            }),
        };

        Ok(Self {
            id: common.id,
            description: common.description,
            required: common.required,
            enabled: common.enabled,
            for_each_task_id: common.for_each_task_id,
            kind: kind.unwrap_or_else(|k| k),
        })
    }
}

/// Parse the variant fields, or describe why they don't parse.
fn typed<T: serde::de::DeserializeOwned>(
    type_name: &str,
    value: &serde_json::Value,
) -> Result<T, GateKind> {
    serde_json::from_value(value.clone()).map_err(|e| GateKind::Malformed {
        type_name: type_name.to_string(),
        message: e.to_string(),
    })
}

#[derive(Deserialize)]
struct RawVerifyConfig {
    #[serde(default)]
    enabled: bool,
    task_id_pattern: Option<String>,
    #[serde(default)]
    task_id_sources: Vec<TaskIdSource>,
    task_id_env: Option<String>,
    #[serde(default)]
    require_task_id: bool,
    waivers_file: Option<String>,
    #[serde(default)]
    gates: Vec<serde_json::Value>,
}

/// The effective, typed verify configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyConfig {
    pub enabled: bool,
    pub task_id_pattern: String,
    pub task_id_sources: Vec<TaskIdSource>,
    pub task_id_env: String,
    /// Fail verification when no task id resolves.
    pub require_task_id: bool,
    /// Waivers file relative to the project root; defaults to `<quality_dir>/waivers.json`.
    pub waivers_file: Option<String>,
    pub gates: Vec<GateSpec>,
}

impl VerifyConfig {
    /// Type a merged verify document.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, ConfigError> {
        let raw: RawVerifyConfig =
            serde_json::from_value(value.clone()).map_err(|e| ConfigError::InvalidValue {
                field: "verify".to_string(),
                message: e.to_string(),
            })?;

        let gates = raw
            .gates
            .iter()
            .enumerate()
            .map(|(i, g)| GateSpec::from_value(i, g))
            .collect::<Result<Vec<_>, _>>()?;

        let task_id_sources = if raw.task_id_sources.is_empty() {
            TaskIdSource::defaults()
        } else {
            raw.task_id_sources
        };

        Ok(Self {
            enabled: raw.enabled,
            task_id_pattern: raw
                .task_id_pattern
                .unwrap_or_else(|| ratchet_core::constants::DEFAULT_TASK_ID_PATTERN.to_string()),
            task_id_sources,
            task_id_env: raw
                .task_id_env
                .unwrap_or_else(|| ratchet_core::constants::DEFAULT_TASK_ID_ENV.to_string()),
            require_task_id: raw.require_task_id,
            waivers_file: raw.waivers_file,
            gates,
        })
    }
}

/// A pack that took part in the merge, for auditability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackRef {
    pub reference: String,
    pub path: String,
}

/// Result of the full merge: typed config plus its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveVerifyConfig {
    pub config: VerifyConfig,
    pub packs: Vec<PackRef>,
    /// The four named commands, materialized for interpolation.
    pub commands: BTreeMap<String, String>,
    /// The merged untyped document the typed config was built from.
    pub document: serde_json::Value,
}
