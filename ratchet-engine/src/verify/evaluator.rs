//! Gate evaluation.
//!
//! Each gate is evaluated independently in list order. Errors and panics
//! inside one gate become a `fail` result for that gate and never stop the
//! remaining gates.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use ratchet_core::constants::MAX_CAPTURED_OUTPUT;
use ratchet_core::errors::GateError;
use ratchet_core::events::{EventDispatcher, GateEvaluatedEvent};
use ratchet_core::traits::CommandRunner;

use super::interpolate::{interpolate, InterpolationContext};
use super::schema::SchemaValidator;
use super::types::{GateOutput, GateResult, GateStatus};
use super::waivers::{resolve_waiver, Waiver};
use crate::patterns::build_regex;
use crate::policy::{GateKind, GateSpec};

/// What a single gate check found, before waivers are considered.
#[derive(Debug, Clone, PartialEq)]
struct Outcome {
    passed: bool,
    message: String,
    details: Value,
    output: Option<GateOutput>,
}

impl Outcome {
    fn new(passed: bool, message: impl Into<String>) -> Self {
        Self {
            passed,
            message: message.into(),
            details: Value::Null,
            output: None,
        }
    }

    fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}

/// Evaluates gates for one verification run.
pub struct GateEvaluator<'a> {
    root: &'a Path,
    runner: &'a dyn CommandRunner,
    context: InterpolationContext,
    task_ids: &'a [String],
    waivers: &'a [Waiver],
    now: DateTime<Utc>,
    events: Option<&'a EventDispatcher>,
}

impl<'a> GateEvaluator<'a> {
    pub fn new(
        root: &'a Path,
        runner: &'a dyn CommandRunner,
        context: InterpolationContext,
        task_ids: &'a [String],
        waivers: &'a [Waiver],
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            root,
            runner,
            context,
            task_ids,
            waivers,
            now,
            events: None,
        }
    }

    pub fn with_events(mut self, events: &'a EventDispatcher) -> Self {
        self.events = Some(events);
        self
    }

    /// Evaluate every enabled gate in order.
    pub fn evaluate_all(&self, gates: &[GateSpec]) -> Vec<GateResult> {
        gates
            .iter()
            .filter(|gate| {
                if !gate.enabled {
                    tracing::debug!(gate = %gate.id, "gate disabled, skipping");
                }
                gate.enabled
            })
            .flat_map(|gate| self.evaluate_gate(gate))
            .collect()
    }

    /// Evaluate one gate. Task-scoped gates yield one result per task id.
    pub fn evaluate_gate(&self, gate: &GateSpec) -> Vec<GateResult> {
        if gate.for_each_task_id {
            let ids: Vec<&str> = if self.task_ids.is_empty() {
                vec![""]
            } else {
                self.task_ids.iter().map(String::as_str).collect()
            };
            ids.into_iter()
                .map(|id| {
                    let context = self.context.with_task(id);
                    let scope = [id.to_string()];
                    let task = (!id.is_empty()).then(|| id.to_string());
                    self.evaluate_in(gate, &context, &scope, task)
                })
                .collect()
        } else {
            let scope: Vec<String> = if self.task_ids.is_empty() {
                vec![String::new()]
            } else {
                self.task_ids.to_vec()
            };
            vec![self.evaluate_in(gate, &self.context, &scope, None)]
        }
    }

    fn evaluate_in(
        &self,
        gate: &GateSpec,
        context: &InterpolationContext,
        scope: &[String],
        task_id: Option<String>,
    ) -> GateResult {
        let start = Instant::now();
        let checked = panic::catch_unwind(AssertUnwindSafe(|| self.check(gate, context, scope)));
        let outcome = match checked {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => Outcome::new(false, e.to_string()),
            Err(payload) => Outcome::new(
                false,
                format!("gate evaluation panicked: {}", panic_message(payload.as_ref())),
            ),
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        let (status, waiver) = if outcome.passed {
            (GateStatus::Pass, None)
        } else if gate.required {
            match resolve_waiver(self.waivers, &gate.id, self.task_ids, self.now) {
                Some(w) => (GateStatus::Waived, Some(w.clone())),
                None => (GateStatus::Fail, None),
            }
        } else {
            (GateStatus::Fail, None)
        };

        tracing::info!(
            gate = %gate.id,
            gate_type = gate.kind.type_name(),
            task_id = task_id.as_deref().unwrap_or(""),
            status = status.as_str(),
            duration_ms,
            "gate evaluated"
        );

        let result = GateResult {
            gate_id: gate.id.clone(),
            gate_type: gate.kind.type_name().to_string(),
            task_id,
            required: gate.required,
            status,
            message: outcome.message,
            details: outcome.details,
            output: outcome.output,
            duration_ms,
            waiver,
        };

        if let Some(events) = self.events {
            events.emit_gate_evaluated(&GateEvaluatedEvent {
                gate_id: result.gate_id.clone(),
                task_id: result.task_id.clone(),
                status: result.status.as_str().to_string(),
                message: result.message.clone(),
            });
        }
        result
    }

    fn check(
        &self,
        gate: &GateSpec,
        context: &InterpolationContext,
        scope: &[String],
    ) -> Result<Outcome, GateError> {
        match &gate.kind {
            GateKind::Command { command } | GateKind::CustomScript { command } => {
                self.check_command(gate, command, context)
            }
            GateKind::FileExists { paths } => self.check_files(gate, paths, context, scope),
            GateKind::Regex {
                file,
                pattern,
                flags,
                min_matches,
            } => self.check_regex(file, pattern, flags, *min_matches, context),
            GateKind::JsonSchema { schema, data } => self.check_schema(schema, data, context, scope),
            GateKind::Unsupported { type_name } => Ok(Outcome::new(
                false,
                format!("unsupported gate type: {}", display_type(type_name)),
            )),
            GateKind::Malformed { message, .. } => Err(GateError::InvalidDefinition {
                id: gate.id.clone(),
                message: message.clone(),
            }),
        }
    }

    fn check_command(
        &self,
        gate: &GateSpec,
        template: &str,
        context: &InterpolationContext,
    ) -> Result<Outcome, GateError> {
        let command = interpolate(template, context);
        if command.trim().is_empty() {
            return Err(GateError::InvalidDefinition {
                id: gate.id.clone(),
                message: format!("command `{template}` is empty after interpolation"),
            });
        }

        let output = self
            .runner
            .run(self.root, &command)
            .map_err(|e| GateError::Command(format!("{command}: {e}")))?;

        let passed = output.success();
        let message = if passed {
            "command exited with code 0".to_string()
        } else {
            format!("command exited with code {}", output.exit_code)
        };
        Ok(Outcome {
            passed,
            message,
            details: Value::Null,
            output: Some(GateOutput {
                command,
                exit_code: output.exit_code,
                stdout: truncate(&output.stdout),
                stderr: truncate(&output.stderr),
            }),
        })
    }

    fn check_files(
        &self,
        gate: &GateSpec,
        paths: &[String],
        context: &InterpolationContext,
        scope: &[String],
    ) -> Result<Outcome, GateError> {
        if paths.is_empty() {
            return Err(GateError::InvalidDefinition {
                id: gate.id.clone(),
                message: "no paths configured".to_string(),
            });
        }

        let mut checked: Vec<String> = Vec::new();
        let mut missing: Vec<String> = Vec::new();
        for task in scope {
            let task_context = context.with_task(task);
            for template in paths {
                let path = interpolate(template, &task_context);
                if checked.contains(&path) {
                    continue;
                }
                if !self.root.join(&path).exists() {
                    missing.push(path.clone());
                }
                checked.push(path);
            }
        }

        let details = json!({ "checked": checked, "missing": missing });
        if missing.is_empty() {
            Ok(Outcome::new(true, format!("all {} path(s) exist", checked.len())).with_details(details))
        } else {
            Ok(Outcome::new(false, format!("missing: {}", missing.join(", "))).with_details(details))
        }
    }

    fn check_regex(
        &self,
        file: &str,
        pattern: &str,
        flags: &str,
        min_matches: usize,
        context: &InterpolationContext,
    ) -> Result<Outcome, GateError> {
        let file = interpolate(file, context);
        let path = self.root.join(&file);
        if !path.is_file() {
            return Ok(Outcome::new(false, format!("file not found: {file}")));
        }

        let pattern = interpolate(pattern, context);
        let regex = build_regex(&pattern, flags).map_err(|e| GateError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        let content = std::fs::read_to_string(&path).map_err(|e| GateError::Io {
            path: file.clone(),
            message: e.to_string(),
        })?;

        let count = regex.find_iter(&content).count();
        let details = json!({ "file": file, "matches": count, "min_matches": min_matches });
        let message = format!("{count} match(es) in {file}, need at least {min_matches}");
        Ok(Outcome::new(count >= min_matches, message).with_details(details))
    }

    fn check_schema(
        &self,
        schema_template: &str,
        data_template: &str,
        context: &InterpolationContext,
        scope: &[String],
    ) -> Result<Outcome, GateError> {
        let schema_path = interpolate(schema_template, context);
        let schema = read_json(self.root, &schema_path)?;
        let validator = SchemaValidator::new(&schema);

        let mut tasks = Vec::with_capacity(scope.len());
        let mut invalid = 0usize;
        let mut first_problem: Option<String> = None;

        for task in scope {
            let data_path = interpolate(data_template, &context.with_task(task));
            let errors = match read_json(self.root, &data_path) {
                Ok(data) => validator.validate(&data),
                Err(e) => vec![e.to_string()],
            };
            if !errors.is_empty() {
                invalid += 1;
                if first_problem.is_none() {
                    first_problem = errors.first().map(|e| format!("{data_path}: {e}"));
                }
            }
            tasks.push(json!({
                "task_id": task,
                "data": data_path,
                "valid": errors.is_empty(),
                "errors": errors,
            }));
        }

        let details = json!({ "schema": schema_path, "tasks": tasks });
        let outcome = if invalid == 0 {
            Outcome::new(true, format!("{} document(s) valid", scope.len()))
        } else {
            Outcome::new(
                false,
                format!(
                    "{invalid} of {} document(s) invalid; first: {}",
                    scope.len(),
                    first_problem.unwrap_or_default()
                ),
            )
        };
        Ok(outcome.with_details(details))
    }
}

fn read_json(root: &Path, relative: &str) -> Result<Value, GateError> {
    let path = root.join(relative);
    let text = std::fs::read_to_string(&path).map_err(|e| GateError::Io {
        path: relative.to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| GateError::Io {
        path: relative.to_string(),
        message: format!("invalid JSON: {e}"),
    })
}

fn display_type(type_name: &str) -> &str {
    if type_name.is_empty() {
        "<missing>"
    } else {
        type_name
    }
}

/// Keep at most `MAX_CAPTURED_OUTPUT` characters.
pub(crate) fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_CAPTURED_OUTPUT) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
