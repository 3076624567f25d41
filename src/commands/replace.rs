use super::{connect, ignore_keys, GlobalOpts};
use crate::compare::{diff_documents, DiffEntry};
use crate::output::emit_json;
use crate::reformat::{normalize, IgnoreKeys};
use crate::resources::{bare_document, ResourceScope, ResourceType};
use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use dialoguer::Input;
use serde_json::Value;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ReplaceArgs {
    #[command(subcommand)]
    pub kind: ReplaceKind,

    /// The file used to replace the resource (required when not using stdin)
    #[arg(short = 'f', long = "filename", global = true)]
    pub filename: Option<PathBuf>,

    /// Replace directly, or show a diff against the remote resource first
    #[arg(short = 'm', long, value_enum, default_value_t = ReplaceMode::Force, global = true)]
    pub mode: ReplaceMode,

    /// Comma-separated JSON keys to strip from the remote resource before comparing
    #[arg(short = 'i', long = "ignore-key", global = true, default_value = "")]
    pub ignore_key: String,

    /// Write the diff report to this file instead of stdout
    #[arg(short = 'd', long = "diff-file", global = true)]
    pub diff_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReplaceMode {
    Force,
    Compare,
}

#[derive(Subcommand, Debug)]
pub enum ReplaceKind {
    #[command(visible_alias = "co")]
    Collection { name: String },
    #[command(visible_alias = "env")]
    Environment { name: String },
    #[command(visible_alias = "mon")]
    Monitor { name: String },
    Mock { name: String },
    #[command(visible_alias = "ws")]
    Workspace { name: String },
    Api { name: String },
    ApiVersion {
        name: String,
        /// The associated API ID
        #[arg(long = "for-api", required = true)]
        for_api: String,
    },
    Schema {
        id: String,
        #[arg(long = "for-api", required = true)]
        for_api: String,
        #[arg(long = "for-api-version", required = true)]
        for_api_version: String,
    },
}

impl ReplaceKind {
    fn target(self) -> (ResourceType, String, ResourceScope) {
        let bare = ResourceScope::default;
        match self {
            ReplaceKind::Collection { name } => (ResourceType::Collection, name, bare()),
            ReplaceKind::Environment { name } => (ResourceType::Environment, name, bare()),
            ReplaceKind::Monitor { name } => (ResourceType::Monitor, name, bare()),
            ReplaceKind::Mock { name } => (ResourceType::Mock, name, bare()),
            ReplaceKind::Workspace { name } => (ResourceType::Workspace, name, bare()),
            ReplaceKind::Api { name } => (ResourceType::Api, name, bare()),
            ReplaceKind::ApiVersion { name, for_api } => (
                ResourceType::ApiVersion,
                name,
                ResourceScope {
                    api: Some(for_api),
                    ..Default::default()
                },
            ),
            ReplaceKind::Schema {
                id,
                for_api,
                for_api_version,
            } => (
                ResourceType::Schema,
                id,
                ResourceScope {
                    api: Some(for_api),
                    api_version: Some(for_api_version),
                    workspace: None,
                },
            ),
        }
    }
}

pub async fn run(args: ReplaceArgs, globals: &GlobalOpts) -> Result<()> {
    if args.mode == ReplaceMode::Compare && args.filename.is_none() {
        return Err(anyhow!("compare mode only works with --filename"));
    }

    let raw = read_candidate(args.filename.as_ref())?;
    let candidate: Value =
        serde_json::from_str(&raw).context("parsing the replacement document as JSON")?;

    let (cfg, client) = connect(globals)?;
    let (kind, name, scope) = args.kind.target();
    let id = client.name_resolver(kind, &scope).await.resolve(&name);

    if args.mode == ReplaceMode::Compare {
        let remote = client
            .get(kind, &id, &scope)
            .await
            .with_context(|| format!("fetching {kind} '{name}' for comparison"))?;
        let ignore = ignore_keys(&args.ignore_key, &cfg);
        let local = bare_document(&candidate, kind.item_key());
        let diffs = plan_replace(&remote, local, &ignore);

        if !review(&diffs, args.diff_file.as_ref())? {
            println!("Cancel!");
            return Ok(());
        }
    }

    let new_id = client
        .replace(kind, &id, &scope, candidate)
        .await
        .with_context(|| format!("replacing {kind} '{name}'"))?;
    println!("{new_id}");
    Ok(())
}

/// Diff the remote resource, normalized, against the candidate document.
///
/// The candidate must already be bare, in the form `get` produces.
pub fn plan_replace(remote: &Value, candidate: &Value, ignore: &IgnoreKeys) -> Vec<DiffEntry> {
    let remote = normalize(remote, true, ignore);
    diff_documents(&remote, candidate)
}

/// `true` when the operator's answer allows the replace to go ahead.
pub fn is_confirmed(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Show the diff report and ask for confirmation. An empty diff needs no
/// confirmation.
fn review(diffs: &[DiffEntry], diff_file: Option<&PathBuf>) -> Result<bool> {
    if diffs.is_empty() {
        tracing::info!("no differences against the remote resource");
        println!("No differences found.");
        return Ok(true);
    }

    match diff_file {
        Some(path) => println!("Write diff report to file {}", path.display()),
        None => println!("Diff report:"),
    }
    emit_json(&diffs, diff_file.map(PathBuf::as_path))?;
    println!("Please check carefully before confirm replace.");

    let answer: String = Input::new()
        .with_prompt("Are you sure to merge (Y/N)")
        .allow_empty(true)
        .interact_text()?;
    Ok(is_confirmed(&answer))
}

/// Read the replacement document from `--filename`, or from stdin when it is piped.
fn read_candidate(filename: Option<&PathBuf>) -> Result<String> {
    if let Some(path) = filename {
        return std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()));
    }
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(anyhow!("flag \"filename\" not set, use \"--filename\" or stdin"));
    }
    let mut buf = String::new();
    stdin
        .lock()
        .read_to_string(&mut buf)
        .context("reading stdin")?;
    Ok(buf)
}
