//! `${path}` token interpolation over a JSON context.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Value};

/// Values available to gate field templates.
///
/// Keys: `quality_dir`, `repo_root`, `commands.<name>`, `task_id`, `task_ids`.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationContext {
    values: Value,
}

impl InterpolationContext {
    pub fn new(
        repo_root: &str,
        quality_dir: &str,
        commands: &BTreeMap<String, String>,
        task_ids: &[String],
    ) -> Self {
        Self {
            values: json!({
                "repo_root": repo_root,
                "quality_dir": quality_dir,
                "commands": commands,
                "task_id": task_ids.first().cloned().unwrap_or_default(),
                "task_ids": task_ids,
            }),
        }
    }

    /// The same context focused on one task id.
    pub fn with_task(&self, task_id: &str) -> Self {
        let mut next = self.clone();
        if let Some(map) = next.values.as_object_mut() {
            map.insert("task_id".to_string(), Value::String(task_id.to_string()));
        }
        next
    }

    /// Look up a dotted path. Numeric segments index arrays.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        path.split('.').try_fold(&self.values, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }
}

static TOKEN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\$\{([^}]*)\}").ok());

/// Replace every `${path}` token with its rendered value.
/// Unknown paths render as the empty string.
pub fn interpolate(template: &str, context: &InterpolationContext) -> String {
    let Some(token) = TOKEN.as_ref() else {
        return template.to_string();
    };
    token
        .replace_all(template, |caps: &regex::Captures<'_>| {
            context
                .lookup(caps[1].trim())
                .map(render)
                .unwrap_or_default()
        })
        .into_owned()
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}
