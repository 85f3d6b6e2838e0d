//! Restricted structural validator for JSON documents.
//!
//! Supported keywords, applied in this order at each node: `$ref` (local
//! `#/...` pointers only), `allOf`, `if`/`then` (no `else`), `const`, `enum`,
//! `type`, `minLength`, `pattern`, `minItems`, `items`, `required`,
//! `properties`, `additionalProperties: false`. Everything else is ignored.
//!
//! Errors accumulate; a document is valid iff the list is empty.

use regex::Regex;
use serde_json::{Map, Value};

/// Consecutive `$ref` hops allowed without descending into the data.
/// Exceeding it means the schema refers to itself in a cycle.
const MAX_REF_HOPS: usize = 64;

/// Validates data against one schema document.
#[derive(Debug, Clone, Copy)]
pub struct SchemaValidator<'a> {
    root: &'a Value,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    /// Path-qualified errors, e.g. `$.items[2].name: ...`.
    pub fn validate(&self, data: &Value) -> Vec<String> {
        let mut errors = Vec::new();
        self.validate_node(self.root, data, "$", 0, &mut errors);
        errors
    }

    pub fn is_valid(&self, data: &Value) -> bool {
        self.validate(data).is_empty()
    }

    fn validate_node(
        &self,
        schema: &Value,
        data: &Value,
        path: &str,
        ref_hops: usize,
        errors: &mut Vec<String>,
    ) {
        let Value::Object(schema) = schema else {
            return;
        };
        if ref_hops > MAX_REF_HOPS {
            errors.push(format!("{path}: $ref cycle detected"));
            return;
        }

        if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
            match self.resolve_ref(reference) {
                Some(target) => self.validate_node(target, data, path, ref_hops + 1, errors),
                None => errors.push(format!("{path}: unresolved $ref {reference}")),
            }
        }

        if let Some(Value::Array(subschemas)) = schema.get("allOf") {
            for sub in subschemas {
                self.validate_node(sub, data, path, ref_hops, errors);
            }
        }

        if let (Some(condition), Some(then)) = (schema.get("if"), schema.get("then")) {
            let mut condition_errors = Vec::new();
            self.validate_node(condition, data, path, ref_hops, &mut condition_errors);
            if condition_errors.is_empty() {
                self.validate_node(then, data, path, ref_hops, errors);
            }
        }

        if let Some(expected) = schema.get("const") {
            if data != expected {
                errors.push(format!("{path}: expected constant {expected}"));
            }
        }

        if let Some(Value::Array(members)) = schema.get("enum") {
            if !members.iter().any(|m| m == data) {
                errors.push(format!("{path}: value is not one of the allowed values"));
            }
        }

        if let Some(expected) = schema.get("type") {
            check_type(expected, data, path, errors);
        }

        match data {
            Value::String(s) => check_string(schema, s, path, errors),
            Value::Array(items) => self.check_array(schema, items, path, errors),
            Value::Object(fields) => self.check_object(schema, fields, path, errors),
            _ => {}
        }
    }

    /// Resolve `#` or `#/a/b` against the root document.
    fn resolve_ref(&self, reference: &str) -> Option<&'a Value> {
        let pointer = reference.strip_prefix('#')?;
        self.root.pointer(pointer)
    }

    fn check_array(
        &self,
        schema: &Map<String, Value>,
        items: &[Value],
        path: &str,
        errors: &mut Vec<String>,
    ) {
        if let Some(min) = schema.get("minItems").and_then(Value::as_u64) {
            if (items.len() as u64) < min {
                errors.push(format!("{path}: expected at least {min} items, got {}", items.len()));
            }
        }
        if let Some(item_schema) = schema.get("items") {
            for (i, item) in items.iter().enumerate() {
                self.validate_node(item_schema, item, &format!("{path}[{i}]"), 0, errors);
            }
        }
    }

    fn check_object(
        &self,
        schema: &Map<String, Value>,
        fields: &Map<String, Value>,
        path: &str,
        errors: &mut Vec<String>,
    ) {
        if let Some(Value::Array(required)) = schema.get("required") {
            for key in required.iter().filter_map(Value::as_str) {
                if !fields.contains_key(key) {
                    errors.push(format!("{path}.{key}: required property is missing"));
                }
            }
        }

        let properties = schema.get("properties").and_then(Value::as_object);
        if let Some(properties) = properties {
            for (key, sub) in properties {
                if let Some(value) = fields.get(key) {
                    self.validate_node(sub, value, &format!("{path}.{key}"), 0, errors);
                }
            }
        }

        if schema.get("additionalProperties") == Some(&Value::Bool(false)) {
            for key in fields.keys() {
                if !properties.is_some_and(|p| p.contains_key(key)) {
                    errors.push(format!("{path}.{key}: additional property is not allowed"));
                }
            }
        }
    }
}

fn check_string(schema: &Map<String, Value>, s: &str, path: &str, errors: &mut Vec<String>) {
    if let Some(min) = schema.get("minLength").and_then(Value::as_u64) {
        let len = s.chars().count() as u64;
        if len < min {
            errors.push(format!("{path}: expected at least {min} characters, got {len}"));
        }
    }
    if let Some(pattern) = schema.get("pattern").and_then(Value::as_str) {
        match Regex::new(pattern) {
            Ok(re) if !re.is_match(s) => {
                errors.push(format!("{path}: does not match pattern {pattern}"));
            }
            Ok(_) => {}
            Err(e) => errors.push(format!("{path}: invalid pattern {pattern}: {e}")),
        }
    }
}

fn check_type(expected: &Value, data: &Value, path: &str, errors: &mut Vec<String>) {
    let allowed: Vec<&str> = match expected {
        Value::String(t) => vec![t.as_str()],
        Value::Array(ts) => ts.iter().filter_map(Value::as_str).collect(),
        _ => return,
    };
    if !allowed.iter().any(|t| matches_type(t, data)) {
        errors.push(format!(
            "{path}: expected type {}, got {}",
            allowed.join(" or "),
            type_name(data)
        ));
    }
}

fn matches_type(expected: &str, data: &Value) -> bool {
    match expected {
        "object" => data.is_object(),
        "array" => data.is_array(),
        "string" => data.is_string(),
        "boolean" => data.is_boolean(),
        "null" => data.is_null(),
        "number" => data.is_number(),
        "integer" => is_integer(data),
        _ => false,
    }
}

fn is_integer(data: &Value) -> bool {
    match data {
        Value::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
        }
        _ => false,
    }
}

fn type_name(data: &Value) -> &'static str {
    match data {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) if is_integer(data) => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
