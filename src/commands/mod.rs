use crate::client::ApiClient;
use crate::config::{config_path, load_config, PostmanctlConfig};
use crate::reformat::IgnoreKeys;
use anyhow::Result;
use clap::Subcommand;

pub mod completions;
pub mod config;
pub mod get;
pub mod replace;

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Retrieve Postman resources by name or identifier")]
    Get(get::GetArgs),
    #[command(about = "Replace existing Postman resources, optionally after a diff and confirmation")]
    Replace(replace::ReplaceArgs),
    #[command(about = "Manage contexts (API root and credentials) in the config file")]
    Config {
        #[command(subcommand)]
        cmd: config::ConfigCommands,
    },
    #[command(about = "Emit shell completion scripts (bash/zsh/fish)")]
    Completions { shell: String },
}

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOpts {
    pub context: Option<String>,
}

pub async fn run(cmd: Commands, globals: &GlobalOpts) -> Result<()> {
    match cmd {
        Commands::Get(args) => get::run(args, globals).await,
        Commands::Replace(args) => replace::run(args, globals).await,
        Commands::Config { cmd } => config::run(cmd),
        Commands::Completions { shell } => completions::run(shell),
    }
}

/// Load the config file and build a client for the active context.
pub(crate) fn connect(globals: &GlobalOpts) -> Result<(PostmanctlConfig, ApiClient)> {
    let cfg = load_config(&config_path())?;
    let ctx = cfg.active_context(globals.context.as_deref())?;
    tracing::debug!("using context '{}' ({})", ctx.name, ctx.api_root);
    let client = ApiClient::new(&ctx)?;
    Ok((cfg, client))
}

/// Keys from `--ignore-key` plus the configured defaults.
pub(crate) fn ignore_keys(flag: &str, cfg: &PostmanctlConfig) -> IgnoreKeys {
    let mut keys = IgnoreKeys::parse(flag);
    keys.extend(cfg.defaults.ignore_keys.iter().map(|k| k.trim()).filter(|k| !k.is_empty()));
    keys
}
