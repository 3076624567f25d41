use super::{connect, ignore_keys, GlobalOpts};
use crate::client::ApiClient;
use crate::output::emit_json;
use crate::reformat::{normalize, IgnoreKeys};
use crate::resources::{ResourceScope, ResourceType};
use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(subcommand)]
    pub kind: GetKind,

    /// Write output to this file instead of stdout
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<PathBuf>,

    /// Comma-separated JSON keys to strip from fetched resources
    #[arg(short = 'i', long = "ignore-key", global = true, default_value = "")]
    pub ignore_key: String,

    /// Keep object entries whose value is null
    #[arg(long, global = true)]
    pub keep_nulls: bool,
}

#[derive(Subcommand, Debug)]
pub enum GetKind {
    #[command(visible_aliases = ["collection", "co"])]
    Collections { names: Vec<String> },
    #[command(visible_aliases = ["environment", "env"])]
    Environments { names: Vec<String> },
    #[command(visible_aliases = ["monitor", "mon"])]
    Monitors { names: Vec<String> },
    #[command(visible_alias = "mock")]
    Mocks { names: Vec<String> },
    #[command(visible_aliases = ["workspace", "ws"])]
    Workspaces { names: Vec<String> },
    #[command(visible_alias = "api")]
    Apis {
        names: Vec<String>,
        /// The associated workspace ID
        #[arg(long)]
        workspace: Option<String>,
    },
    #[command(visible_alias = "api-version")]
    ApiVersions {
        names: Vec<String>,
        /// The associated API ID
        #[arg(long = "for-api", required = true)]
        for_api: String,
    },
    Schema {
        /// Schema ID; defaults to the first schema of the API version
        id: Option<String>,
        #[arg(long = "for-api", required = true)]
        for_api: String,
        #[arg(long = "for-api-version", required = true)]
        for_api_version: String,
    },
    User,
    ApiRelations {
        #[arg(long = "for-api", required = true)]
        for_api: String,
        #[arg(long = "for-api-version", required = true)]
        for_api_version: String,
    },
}

impl GetKind {
    fn resource_type(&self) -> ResourceType {
        match self {
            GetKind::Collections { .. } => ResourceType::Collection,
            GetKind::Environments { .. } => ResourceType::Environment,
            GetKind::Monitors { .. } => ResourceType::Monitor,
            GetKind::Mocks { .. } => ResourceType::Mock,
            GetKind::Workspaces { .. } => ResourceType::Workspace,
            GetKind::Apis { .. } => ResourceType::Api,
            GetKind::ApiVersions { .. } => ResourceType::ApiVersion,
            GetKind::Schema { .. } => ResourceType::Schema,
            GetKind::User => ResourceType::User,
            GetKind::ApiRelations { .. } => ResourceType::ApiRelations,
        }
    }
}

/// How fetched documents are normalized before output
pub struct FetchOptions {
    pub remove_nil: bool,
    pub ignore: IgnoreKeys,
}

pub async fn run(args: GetArgs, globals: &GlobalOpts) -> Result<()> {
    let (cfg, client) = connect(globals)?;
    let opts = FetchOptions {
        remove_nil: !args.keep_nulls,
        ignore: ignore_keys(&args.ignore_key, &cfg),
    };
    let kind = args.kind.resource_type();

    let output = match args.kind {
        GetKind::Collections { names }
        | GetKind::Environments { names }
        | GetKind::Monitors { names }
        | GetKind::Mocks { names }
        | GetKind::Workspaces { names } => {
            list_or_fetch(&client, kind, &names, &ResourceScope::default(), &opts).await?
        }
        GetKind::Apis { names, workspace } => {
            let scope = ResourceScope {
                workspace,
                ..Default::default()
            };
            list_or_fetch(&client, kind, &names, &scope, &opts).await?
        }
        GetKind::ApiVersions { names, for_api } => {
            let scope = ResourceScope {
                api: Some(for_api),
                ..Default::default()
            };
            list_or_fetch(&client, kind, &names, &scope, &opts).await?
        }
        GetKind::Schema {
            id,
            for_api,
            for_api_version,
        } => {
            let scope = ResourceScope {
                api: Some(for_api),
                api_version: Some(for_api_version.clone()),
                workspace: None,
            };
            let id = match id {
                Some(id) => id,
                None => first_schema_id(&client, &for_api_version, &scope).await?,
            };
            let schema = client.get(kind, &id, &scope).await?;
            normalize(&schema, opts.remove_nil, &opts.ignore)
        }
        GetKind::User => {
            let user = client.user().await?;
            normalize(&user, opts.remove_nil, &opts.ignore)
        }
        GetKind::ApiRelations {
            for_api,
            for_api_version,
        } => {
            let scope = ResourceScope {
                api: Some(for_api),
                api_version: Some(for_api_version),
                workspace: None,
            };
            client.api_relations(&scope).await?
        }
    };

    emit_json(&output, args.file.as_deref())
}

/// List every resource when no names are given, otherwise fetch each named one.
async fn list_or_fetch(
    client: &ApiClient,
    kind: ResourceType,
    names: &[String],
    scope: &ResourceScope,
    opts: &FetchOptions,
) -> Result<Value> {
    if names.is_empty() {
        let items = client.list(kind, scope).await?;
        return Ok(Value::Array(items));
    }
    let docs = fetch_named(client, kind, names, scope, opts).await?;
    Ok(Value::Array(docs))
}

/// Resolve each name to an identifier, fetch it and normalize the result.
pub async fn fetch_named(
    client: &ApiClient,
    kind: ResourceType,
    names: &[String],
    scope: &ResourceScope,
    opts: &FetchOptions,
) -> Result<Vec<Value>> {
    let resolver = client.name_resolver(kind, scope).await;
    let mut docs = Vec::with_capacity(names.len());
    for name in names {
        let id = resolver.resolve(name);
        let doc = match client.get(kind, &id, scope).await {
            Ok(doc) => doc,
            Err(err) => {
                let err = err.context(format!("fetching {kind} '{name}'"));
                return Err(match resolver.suggest(name) {
                    Some(hint) => err.context(format!("did you mean '{hint}'?")),
                    None => err,
                });
            }
        };
        docs.push(normalize(&doc, opts.remove_nil, &opts.ignore));
    }
    Ok(docs)
}

async fn first_schema_id(
    client: &ApiClient,
    version: &str,
    scope: &ResourceScope,
) -> Result<String> {
    let doc = client
        .get(ResourceType::ApiVersion, version, scope)
        .await
        .with_context(|| format!("fetching api-version '{version}'"))?;
    doc.get("schema")
        .and_then(Value::as_array)
        .and_then(|ids| ids.first())
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("no schema has been associated with this API version"))
}
