//! Resource catalog for the Postman API
//!
//! Maps each resource kind to its endpoint and to the envelope keys the API
//! wraps payloads in (`{"collection": {...}}`, `{"collections": [...]}`).

use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Collection,
    Environment,
    Monitor,
    Mock,
    Workspace,
    Api,
    ApiVersion,
    Schema,
    User,
    ApiRelations,
}

/// Parent identifiers needed by nested resources.
#[derive(Debug, Clone, Default)]
pub struct ResourceScope {
    pub api: Option<String>,
    pub api_version: Option<String>,
    pub workspace: Option<String>,
}

impl ResourceScope {
    fn require_api(&self) -> Result<&str> {
        self.api
            .as_deref()
            .ok_or_else(|| anyhow!("flag \"--for-api\" is required for this resource"))
    }

    fn require_api_version(&self) -> Result<&str> {
        self.api_version
            .as_deref()
            .ok_or_else(|| anyhow!("flag \"--for-api-version\" is required for this resource"))
    }
}

impl ResourceType {
    /// Envelope key around a single resource.
    pub fn item_key(self) -> &'static str {
        match self {
            ResourceType::Collection => "collection",
            ResourceType::Environment => "environment",
            ResourceType::Monitor => "monitor",
            ResourceType::Mock => "mock",
            ResourceType::Workspace => "workspace",
            ResourceType::Api => "api",
            ResourceType::ApiVersion => "version",
            ResourceType::Schema => "schema",
            ResourceType::User => "user",
            ResourceType::ApiRelations => "relations",
        }
    }

    /// Envelope key around a list of resources, for kinds that can be listed.
    pub fn list_key(self) -> Option<&'static str> {
        match self {
            ResourceType::Collection => Some("collections"),
            ResourceType::Environment => Some("environments"),
            ResourceType::Monitor => Some("monitors"),
            ResourceType::Mock => Some("mocks"),
            ResourceType::Workspace => Some("workspaces"),
            ResourceType::Api => Some("apis"),
            ResourceType::ApiVersion => Some("versions"),
            ResourceType::Schema | ResourceType::User | ResourceType::ApiRelations => None,
        }
    }

    pub fn is_replaceable(self) -> bool {
        !matches!(self, ResourceType::User | ResourceType::ApiRelations)
    }

    /// Path of the collection endpoint, relative to the API root.
    pub fn list_path(self, scope: &ResourceScope) -> Result<String> {
        let path = match self {
            ResourceType::Collection => "/collections".to_string(),
            ResourceType::Environment => "/environments".to_string(),
            ResourceType::Monitor => "/monitors".to_string(),
            ResourceType::Mock => "/mocks".to_string(),
            ResourceType::Workspace => "/workspaces".to_string(),
            ResourceType::Api => "/apis".to_string(),
            ResourceType::ApiVersion => format!("/apis/{}/versions", scope.require_api()?),
            ResourceType::Schema => format!(
                "/apis/{}/versions/{}/schemas",
                scope.require_api()?,
                scope.require_api_version()?
            ),
            ResourceType::User => return Ok("/me".to_string()),
            ResourceType::ApiRelations => {
                return Ok(format!(
                    "/apis/{}/versions/{}/relations",
                    scope.require_api()?,
                    scope.require_api_version()?
                ))
            }
        };
        Ok(path)
    }

    /// Path of a single resource, relative to the API root.
    pub fn item_path(self, id: &str, scope: &ResourceScope) -> Result<String> {
        match self {
            ResourceType::User | ResourceType::ApiRelations => self.list_path(scope),
            _ => Ok(format!("{}/{}", self.list_path(scope)?, id)),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceType::Collection => "collection",
            ResourceType::Environment => "environment",
            ResourceType::Monitor => "monitor",
            ResourceType::Mock => "mock",
            ResourceType::Workspace => "workspace",
            ResourceType::Api => "api",
            ResourceType::ApiVersion => "api-version",
            ResourceType::Schema => "schema",
            ResourceType::User => "user",
            ResourceType::ApiRelations => "api-relations",
        };
        f.write_str(name)
    }
}

/// Take the payload out of `{"<key>": payload}`. Bodies without the envelope
/// are returned as-is.
pub fn unwrap_envelope(body: Value, key: &str) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key(key) => map.remove(key).unwrap_or(Value::Null),
        other => other,
    }
}

/// `true` when `document` is exactly `{"<key>": ...}`.
pub fn is_enveloped(document: &Value, key: &str) -> bool {
    matches!(document, Value::Object(map) if map.len() == 1 && map.contains_key(key))
}

/// The resource inside a local document, which may or may not carry its envelope.
pub fn bare_document<'a>(document: &'a Value, key: &str) -> &'a Value {
    if is_enveloped(document, key) {
        &document[key]
    } else {
        document
    }
}

/// Wrap a bare resource as `{"<key>": document}` unless it is already wrapped.
pub fn wrap_envelope(document: Value, key: &str) -> Value {
    if is_enveloped(&document, key) {
        return document;
    }
    let mut map = Map::new();
    map.insert(key.to_string(), document);
    Value::Object(map)
}

/// Identifier of a resource: `uid` when the API provides one, `id` otherwise.
pub fn resource_id(item: &Value) -> Option<String> {
    ["uid", "id"]
        .iter()
        .filter_map(|k| item.get(*k))
        .find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// Build a name to identifier index from a list response.
///
/// When several resources share a name the last one listed wins.
pub fn name_index(items: &[Value]) -> HashMap<String, String> {
    let mut index = HashMap::new();
    for item in items {
        let name = match item.get("name").and_then(Value::as_str) {
            Some(name) => name,
            None => continue,
        };
        if let Some(id) = resource_id(item) {
            index.insert(name.to_string(), id);
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_paths_require_parents() {
        let scope = ResourceScope::default();
        assert!(ResourceType::ApiVersion.list_path(&scope).is_err());

        let scope = ResourceScope {
            api: Some("a1".into()),
            api_version: Some("v1".into()),
            workspace: None,
        };
        assert_eq!(
            ResourceType::ApiVersion.item_path("v1", &scope).unwrap(),
            "/apis/a1/versions/v1"
        );
        assert_eq!(
            ResourceType::Schema.item_path("s1", &scope).unwrap(),
            "/apis/a1/versions/v1/schemas/s1"
        );
        assert_eq!(
            ResourceType::ApiRelations.item_path("", &scope).unwrap(),
            "/apis/a1/versions/v1/relations"
        );
        assert_eq!(ResourceType::User.item_path("", &scope).unwrap(), "/me");
    }

    #[test]
    fn envelope_round_trip() {
        let doc = json!({"name": "A"});
        let wrapped = wrap_envelope(doc.clone(), "collection");
        assert_eq!(wrapped, json!({"collection": {"name": "A"}}));
        assert_eq!(wrap_envelope(wrapped.clone(), "collection"), wrapped);
        assert_eq!(unwrap_envelope(wrapped, "collection"), doc);
        assert_eq!(unwrap_envelope(json!([1]), "collection"), json!([1]));
    }

    #[test]
    fn bare_document_strips_only_the_matching_envelope() {
        let inner = json!({"name": "A", "tags": ["x"]});
        let wrapped = json!({"collection": inner.clone()});
        assert_eq!(bare_document(&wrapped, "collection"), &inner);
        assert_eq!(bare_document(&inner, "collection"), &inner);
        assert_eq!(bare_document(&wrapped, "environment"), &wrapped);

        let extra = json!({"collection": {"name": "A"}, "info": 1});
        assert_eq!(bare_document(&extra, "collection"), &extra);
    }

    #[test]
    fn name_index_prefers_uid() {
        let items = vec![
            json!({"name": "A", "id": "1", "uid": "u-1"}),
            json!({"name": "B", "id": "2"}),
            json!({"id": "3"}),
        ];
        let index = name_index(&items);
        assert_eq!(index.len(), 2);
        assert_eq!(index["A"], "u-1");
        assert_eq!(index["B"], "2");
    }
}
