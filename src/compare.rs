//! Structural diff between two JSON documents
//!
//! Objects are compared key by key, arrays as multisets (element order is
//! ignored, duplicates are counted), and anything else by value. When the two
//! sides have different JSON types a single entry is reported for the whole
//! subtree without recursing into it.

use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, HashMap};
use std::mem::discriminant;

/// One reported difference. `path` is dot-separated and only meant for humans.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffEntry {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new: Option<Value>,
}

impl DiffEntry {
    fn changed(path: &str, old: &Value, new: &Value) -> Self {
        DiffEntry {
            path: path.to_string(),
            old: Some(old.clone()),
            new: Some(new.clone()),
        }
    }
}

/// Diff two whole documents starting from the root path `""`.
pub fn diff_documents(old: &Value, new: &Value) -> Vec<DiffEntry> {
    compare_values("", old, new)
}

/// Compare two objects. Keys missing on one side are reported with only the
/// present side populated; shared keys are compared recursively.
pub fn compare_maps(
    path: &str,
    old: &Map<String, Value>,
    new: &Map<String, Value>,
) -> Vec<DiffEntry> {
    let mut diffs = Vec::new();

    for (key, value) in old {
        if !new.contains_key(key) {
            diffs.push(DiffEntry {
                path: child_path(path, key),
                old: Some(value.clone()),
                new: None,
            });
        }
    }

    for (key, value) in new {
        let child = child_path(path, key);
        match old.get(key) {
            None => diffs.push(DiffEntry {
                path: child,
                old: None,
                new: Some(value.clone()),
            }),
            Some(previous) => diffs.extend(compare_values(&child, previous, value)),
        }
    }

    diffs
}

/// Compare two values of any type.
pub fn compare_values(path: &str, old: &Value, new: &Value) -> Vec<DiffEntry> {
    if discriminant(old) != discriminant(new) {
        return vec![DiffEntry::changed(path, old, new)];
    }

    match (old, new) {
        (Value::Object(a), Value::Object(b)) => compare_maps(path, a, b),
        (Value::Array(a), Value::Array(b)) => compare_arrays(path, a, b),
        (a, b) if scalars_equal(a, b) => Vec::new(),
        (a, b) => vec![DiffEntry::changed(path, a, b)],
    }
}

/// Compare two arrays as multisets.
///
/// Every element of `new` consumes one equal element of `old` if any is left.
/// Unmatched elements end up in a single entry at `path` whose `old` and `new`
/// are arrays of the leftovers from each side.
pub fn compare_arrays(path: &str, old: &[Value], new: &[Value]) -> Vec<DiffEntry> {
    let old_keys: Vec<String> = old.iter().map(canonical_key).collect();

    let mut remaining: HashMap<&str, usize> = HashMap::new();
    for key in &old_keys {
        *remaining.entry(key.as_str()).or_insert(0) += 1;
    }

    let mut new_only = Vec::new();
    for item in new {
        let key = canonical_key(item);
        match remaining.get_mut(key.as_str()) {
            Some(count) if *count > 0 => *count -= 1,
            _ => new_only.push(item.clone()),
        }
    }

    // Each leftover key is emitted once per unmatched occurrence, at the
    // position of its first occurrence in `old`.
    let mut old_only = Vec::new();
    for (item, key) in old.iter().zip(&old_keys) {
        if let Some(count) = remaining.get_mut(key.as_str()) {
            for _ in 0..*count {
                old_only.push(item.clone());
            }
            *count = 0;
        }
    }

    if old_only.is_empty() && new_only.is_empty() {
        return Vec::new();
    }

    vec![DiffEntry {
        path: path.to_string(),
        old: Some(Value::Array(old_only)),
        new: Some(Value::Array(new_only)),
    }]
}

/// Deterministic encoding of a value, used to match array elements.
///
/// Object keys are sorted and numbers are rendered through `f64`, so values
/// that compare equal always produce the same key.
pub fn canonical_key(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&canonical_number(n)),
        Value::String(s) => out.push_str(&Value::String(s.clone()).to_string()),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let sorted: BTreeMap<&String, &Value> = map.iter().collect();
            out.push('{');
            for (i, (key, item)) in sorted.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
    }
}

fn canonical_number(n: &Number) -> String {
    match n.as_f64() {
        // -0.0 and 0.0 are equal as f64 and must share a key
        Some(f) if f == 0.0 => "0.0".to_string(),
        Some(f) => Number::from_f64(f)
            .map(|n| n.to_string())
            .unwrap_or_else(|| n.to_string()),
        None => n.to_string(),
    }
}

fn scalars_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

fn child_path(parent: &str, key: &str) -> String {
    format!("{parent}.{key}")
}
