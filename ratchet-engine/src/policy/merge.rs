//! Value-level merge of verify documents.
//!
//! Scalars and non-gate arrays in the patch replace the base. `gates` merge
//! by `id`: a patch gate with a known id shallow-patches that gate in place,
//! a new id is appended. Gate order is first appearance.

use serde_json::{Map, Value};

/// Merge `patch` over `base`. Non-object inputs: the patch wins unless null.
pub fn merge(base: &Value, patch: &Value) -> Value {
    match (base, patch) {
        (Value::Object(b), Value::Object(p)) => Value::Object(merge_objects(b, p)),
        (_, Value::Null) => base.clone(),
        _ => patch.clone(),
    }
}

fn merge_objects(base: &Map<String, Value>, patch: &Map<String, Value>) -> Map<String, Value> {
    let mut out = base.clone();
    for (key, value) in patch {
        if value.is_null() {
            continue;
        }
        if key == "gates" {
            let merged = merge_gates(out.get(key), value);
            out.insert(key.clone(), merged);
        } else {
            out.insert(key.clone(), value.clone());
        }
    }
    out
}

fn merge_gates(base: Option<&Value>, patch: &Value) -> Value {
    let mut gates: Vec<Value> = match base {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    };
    let Value::Array(incoming) = patch else {
        return patch.clone();
    };

    for gate in incoming {
        let existing = gate_id(gate).and_then(|id| {
            gates
                .iter()
                .position(|g| gate_id(g).is_some_and(|other| other == id))
        });
        match (existing, gate) {
            (Some(pos), Value::Object(fields)) => {
                if let Value::Object(target) = &mut gates[pos] {
                    for (k, v) in fields {
                        if !v.is_null() {
                            target.insert(k.clone(), v.clone());
                        }
                    }
                }
            }
            _ => gates.push(gate.clone()),
        }
    }
    Value::Array(gates)
}

fn gate_id(gate: &Value) -> Option<&str> {
    gate.get("id").and_then(Value::as_str)
}
