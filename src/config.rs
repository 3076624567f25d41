//! Configuration management for postmanctl
//!
//! Settings live in a single YAML file holding named contexts, each pointing
//! at an API root with its own credentials, plus defaults applied to every
//! command. The file is read from `POSTMANCTL_CONFIG` when set, otherwise
//! from `<config dir>/postmanctl/config.yaml`.
//!
//! ## Environment Variable Expansion
//!
//! The file supports environment variable expansion before it is parsed:
//! - `${VAR}` - Simple substitution
//! - `${VAR:-default}` - Use default if VAR is unset or empty
//! - `${VAR-default}` - Use default if VAR is unset
//! - `${VAR:+alt}` - Use alt if VAR is set and non-empty
//! - `${VAR+alt}` - Use alt if VAR is set

use crate::constants::{
    API_KEY_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME, CONFIG_PATH_ENV, DEFAULT_API_ROOT,
    DEFAULT_TIMEOUT_SECS,
};
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};

/// Top-level configuration file
///
/// # Example
///
/// ```yaml
/// currentContext: work
/// contexts:
///   - name: work
///     apiRoot: https://api.getpostman.com
///     apiKeyEnv: POSTMAN_WORK_KEY
///   - name: personal
///     apiKey: ${POSTMAN_PERSONAL_KEY}
/// defaults:
///   ignoreKeys: [id, uid, owner]
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PostmanctlConfig {
    /// Context used when `--context` is not given
    #[serde(default)]
    pub current_context: Option<String>,
    #[serde(default)]
    pub contexts: Vec<ContextConfig>,
    #[serde(default)]
    pub defaults: Defaults,
}

/// Connection details for one API account
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContextConfig {
    pub name: String,
    #[serde(default = "default_api_root")]
    pub api_root: String,
    /// Environment variable holding the API key
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Inline API key, usually written as a `${VAR}` placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Settings merged into every command
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Defaults {
    /// Keys stripped from every fetched document
    #[serde(default)]
    pub ignore_keys: Vec<String>,
}

fn default_api_root() -> String {
    DEFAULT_API_ROOT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ContextConfig {
    pub fn new(name: &str) -> Self {
        ContextConfig {
            name: name.to_string(),
            api_root: default_api_root(),
            api_key_env: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Resolve the API key.
    ///
    /// `POSTMANCTL_API_KEY` wins, then the context's `apiKeyEnv` variable,
    /// then the inline `apiKey`.
    pub fn api_key(&self) -> Result<String> {
        if let Some(key) = env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()) {
            return Ok(key);
        }
        if let Some(var) = &self.api_key_env {
            return env::var(var).with_context(|| {
                format!("reading API key from ${var} for context '{}'", self.name)
            });
        }
        match &self.api_key {
            Some(key) if !key.is_empty() => Ok(key.clone()),
            _ => Err(anyhow!(
                "no API key for context '{}'; set {API_KEY_ENV} or configure apiKeyEnv",
                self.name
            )),
        }
    }
}

impl PostmanctlConfig {
    pub fn find_context(&self, name: &str) -> Option<&ContextConfig> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Pick the context to use: the explicit override, then `currentContext`.
    ///
    /// With no file-based context at all, a default context pointing at the
    /// public API is returned so `POSTMANCTL_API_KEY` alone is enough.
    pub fn active_context(&self, override_name: Option<&str>) -> Result<ContextConfig> {
        match override_name.or(self.current_context.as_deref()) {
            Some(name) => self.find_context(name).cloned().ok_or_else(|| {
                anyhow!(
                    "context '{name}' not found. Available contexts: {}",
                    self.context_names().join(", ")
                )
            }),
            None => Ok(ContextConfig::new("default")),
        }
    }

    pub fn context_names(&self) -> Vec<String> {
        self.contexts.iter().map(|c| c.name.clone()).collect()
    }

    /// Insert or replace a context by name.
    pub fn upsert_context(&mut self, ctx: ContextConfig) {
        match self.contexts.iter_mut().find(|c| c.name == ctx.name) {
            Some(existing) => *existing = ctx,
            None => self.contexts.push(ctx),
        }
    }

    /// Remove a context. Returns false when no context had that name.
    pub fn remove_context(&mut self, name: &str) -> bool {
        let before = self.contexts.len();
        self.contexts.retain(|c| c.name != name);
        if self.current_context.as_deref() == Some(name) {
            self.current_context = None;
        }
        self.contexts.len() != before
    }
}

pub fn config_path() -> PathBuf {
    env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push(CONFIG_DIR_NAME);
            p.push(CONFIG_FILE_NAME);
            p
        })
}

/// Load the configuration, or an empty one when the file does not exist.
pub fn load_config(path: &Path) -> Result<PostmanctlConfig> {
    if !path.exists() {
        tracing::debug!("no config file at {}, using defaults", path.display());
        return Ok(PostmanctlConfig::default());
    }
    let data = preprocess_config(path)?;
    let cfg: PostmanctlConfig = serde_yaml::from_str(&data)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

pub fn save_config(cfg: &PostmanctlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_yaml::to_string(cfg)?;
    fs::write(path, data).with_context(|| format!("writing config {}", path.display()))?;
    tracing::info!("saved config to {}", path.display());
    Ok(())
}

pub fn expand_env_placeholders(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?:(:?[-+])([^}]*))?\}")?;
    let expanded = re.replace_all(input, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let op = caps.get(2).map_or("", |m| m.as_str());
        let val = caps.get(3).map_or("", |m| m.as_str());
        let var = env::var(var_name).ok();

        match (var.as_deref(), op) {
            (Some(v), "") => v.to_string(),
            (Some(v), ":-") if !v.is_empty() => v.to_string(),
            (_, ":-") => val.to_string(),
            (Some(v), "-") => v.to_string(),
            (None, "-") => val.to_string(),
            (Some(v), ":+") if !v.is_empty() => val.to_string(),
            (Some(_), "+") => val.to_string(),
            _ => String::new(),
        }
    });
    Ok(expanded.into_owned())
}

pub fn preprocess_config(path: &Path) -> Result<String> {
    let raw_data =
        fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    expand_env_placeholders(&raw_data)
}
