use crate::config::ContextConfig;
use crate::constants::API_KEY_HEADER;
use crate::resolve::NameResolver;
use crate::resources::{resource_id, unwrap_envelope, wrap_envelope, ResourceScope, ResourceType};
use anyhow::{anyhow, Context, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client, Method,
};
use serde_json::Value;
use std::time::Duration;

/// Longest slice of an error body kept in an error message
const MAX_ERROR_BODY: usize = 200;

pub struct ApiClient {
    pub context: String,
    pub base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(cfg: &ContextConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = cfg.api_key()?;
        let mut hv = HeaderValue::from_str(&key).context("API key is not a valid header value")?;
        hv.set_sensitive(true);
        headers.insert(API_KEY_HEADER, hv);

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("postmanctl/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(ApiClient {
            context: cfg.name.clone(),
            base_url: cfg.api_root.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(context = %self.context, "{} {}", method, url);

        let mut req = self.client.request(method.clone(), &url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req
            .send()
            .await
            .with_context(|| format!("{method} {url} failed"))?;
        let status = resp.status();
        let text = resp.text().await.context("reading response body")?;

        if !status.is_success() {
            tracing::debug!("{} {} returned {}", method, url, status);
            return Err(anyhow!("{}", describe_error(status.as_u16(), &text)));
        }

        serde_json::from_str(&text).with_context(|| format!("parsing response from {url}"))
    }

    /// List every resource of a kind.
    pub async fn list(&self, kind: ResourceType, scope: &ResourceScope) -> Result<Vec<Value>> {
        let list_key = kind
            .list_key()
            .ok_or_else(|| anyhow!("{kind} resources cannot be listed"))?;
        let path = kind.list_path(scope)?;
        let query: Vec<(&str, &str)> = match (kind, scope.workspace.as_deref()) {
            (ResourceType::Api, Some(ws)) => vec![("workspace", ws)],
            _ => Vec::new(),
        };

        let body = self.request(Method::GET, &path, &query, None).await?;
        match unwrap_envelope(body, list_key) {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            other => Err(anyhow!("unexpected {list_key} payload: expected an array, got {other}")),
        }
    }

    /// Fetch a single resource, without its envelope.
    pub async fn get(&self, kind: ResourceType, id: &str, scope: &ResourceScope) -> Result<Value> {
        let path = kind.item_path(id, scope)?;
        let body = self.request(Method::GET, &path, &[], None).await?;
        Ok(unwrap_envelope(body, kind.item_key()))
    }

    /// Overwrite a resource with `document` and return the identifier the API reports.
    pub async fn replace(
        &self,
        kind: ResourceType,
        id: &str,
        scope: &ResourceScope,
        document: Value,
    ) -> Result<String> {
        if !kind.is_replaceable() {
            return Err(anyhow!("{kind} resources cannot be replaced"));
        }
        let path = kind.item_path(id, scope)?;
        let body = wrap_envelope(document, kind.item_key());
        let resp = self.request(Method::PUT, &path, &[], Some(&body)).await?;
        let item = unwrap_envelope(resp, kind.item_key());
        Ok(resource_id(&item).unwrap_or_else(|| id.to_string()))
    }

    pub async fn user(&self) -> Result<Value> {
        self.get(ResourceType::User, "", &ResourceScope::default()).await
    }

    pub async fn api_relations(&self, scope: &ResourceScope) -> Result<Value> {
        self.get(ResourceType::ApiRelations, "", scope).await
    }

    /// Build a name resolver from the list endpoint of `kind`.
    ///
    /// Listing failures are not fatal: arguments are then used as identifiers.
    pub async fn name_resolver(&self, kind: ResourceType, scope: &ResourceScope) -> NameResolver {
        if kind.list_key().is_none() {
            return NameResolver::default();
        }
        match self.list(kind, scope).await {
            Ok(items) => NameResolver::from_items(&items),
            Err(err) => {
                tracing::warn!("could not list {kind} resources for name lookup: {err:#}");
                NameResolver::default()
            }
        }
    }
}

/// Turn an error response into a message, preferring the API's own
/// `{"error": {"name": ..., "message": ...}}` body.
fn describe_error(status: u16, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let api_error = parsed.as_ref().and_then(|v| v.get("error"));
    if let Some(message) = api_error.and_then(|e| e.get("message")).and_then(Value::as_str) {
        let name = api_error
            .and_then(|e| e.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("error");
        return format!("API request failed ({status}): {name}: {message}");
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("API request failed ({status})")
    } else {
        let snippet: String = trimmed.chars().take(MAX_ERROR_BODY).collect();
        format!("API request failed ({status}): {snippet}")
    }
}
