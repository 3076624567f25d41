//! Document normalization
//!
//! Produces a canonical, comparable copy of a JSON document by dropping
//! suppressed keys at every depth and eliding nulls. Object values that are
//! `null` are dropped only when `remove_nil` is set; `null` array elements are
//! always dropped.

use serde_json::{Map, Value};
use std::collections::HashSet;

/// Set of object keys removed from a document at any nesting depth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreKeys(HashSet<String>);

impl IgnoreKeys {
    /// Parse a comma-separated list such as `"id, uid,owner"`.
    ///
    /// Whitespace around each key is trimmed and empty segments are skipped,
    /// so `""` yields an empty set.
    pub fn parse(csv: &str) -> Self {
        csv.split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Add every key from `other` to this set.
    pub fn extend<I, S>(&mut self, other: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(other.into_iter().map(Into::into));
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreKeys {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        IgnoreKeys(iter.into_iter().map(Into::into).collect())
    }
}

/// Return a normalized copy of `value`.
///
/// A bare top-level `null` stays `null`; scalars are returned unchanged.
pub fn normalize(value: &Value, remove_nil: bool, ignore: &IgnoreKeys) -> Value {
    match value {
        Value::Object(map) => Value::Object(normalize_map(map, remove_nil, ignore)),
        Value::Array(items) => Value::Array(normalize_array(items, remove_nil, ignore)),
        other => other.clone(),
    }
}

/// Normalize every entry of an object, skipping suppressed keys without
/// inspecting their values.
pub fn normalize_map(
    map: &Map<String, Value>,
    remove_nil: bool,
    ignore: &IgnoreKeys,
) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in map {
        if ignore.contains(key) {
            continue;
        }
        if value.is_null() && remove_nil {
            continue;
        }
        out.insert(key.clone(), normalize(value, remove_nil, ignore));
    }
    out
}

/// Normalize every element of an array. `null` elements are dropped
/// regardless of `remove_nil`.
pub fn normalize_array(items: &[Value], remove_nil: bool, ignore: &IgnoreKeys) -> Vec<Value> {
    items
        .iter()
        .filter(|v| !v.is_null())
        .map(|v| normalize(v, remove_nil, ignore))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_ignore_keys_trims_and_skips_empty() {
        let keys = IgnoreKeys::parse(" id, uid,,owner ,");
        assert_eq!(keys.len(), 3);
        assert!(keys.contains("id"));
        assert!(keys.contains("uid"));
        assert!(keys.contains("owner"));
        assert!(IgnoreKeys::parse("").is_empty());
    }

    #[test]
    fn object_nulls_dropped_only_with_remove_nil() {
        let doc = json!({"a": null, "b": 1});
        let none = IgnoreKeys::default();
        assert_eq!(normalize(&doc, true, &none), json!({"b": 1}));
        assert_eq!(normalize(&doc, false, &none), json!({"a": null, "b": 1}));
    }

    #[test]
    fn array_nulls_always_dropped() {
        let doc = json!({"a": null, "b": [null, 1, null]});
        let none = IgnoreKeys::default();
        assert_eq!(normalize(&doc, true, &none), json!({"b": [1]}));
        assert_eq!(normalize(&doc, false, &none), json!({"a": null, "b": [1]}));
    }

    #[test]
    fn suppressed_keys_removed_at_every_depth() {
        let doc = json!({
            "id": "top",
            "name": "A",
            "item": [{"id": "nested", "request": {"id": "deep", "url": "x"}}]
        });
        let keys = IgnoreKeys::parse("id");
        assert_eq!(
            normalize(&doc, true, &keys),
            json!({"name": "A", "item": [{"request": {"url": "x"}}]})
        );
    }

    #[test]
    fn suppressed_key_wins_over_null_value() {
        let doc = json!({"secret": null, "x": {"secret": {"deep": 1}}});
        let keys = IgnoreKeys::parse("secret");
        assert_eq!(normalize(&doc, false, &keys), json!({"x": {}}));
    }

    #[test]
    fn bare_values_pass_through() {
        let none = IgnoreKeys::default();
        assert_eq!(normalize(&Value::Null, true, &none), Value::Null);
        assert_eq!(normalize(&json!("s"), true, &none), json!("s"));
        assert_eq!(normalize(&json!(2.5), true, &none), json!(2.5));
        assert_eq!(normalize(&json!([[null], null]), false, &none), json!([[]]));
    }

    #[test]
    fn input_is_not_mutated() {
        let doc = json!({"a": null, "secret": 1});
        let before = doc.clone();
        let _ = normalize(&doc, true, &IgnoreKeys::parse("secret"));
        assert_eq!(doc, before);
    }
}
