use crate::config::{config_path, load_config, save_config, ContextConfig};
use anyhow::{anyhow, Result};
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Create or update a context
    SetContext {
        name: String,
        /// Base URL of the API
        #[arg(long)]
        api_root: Option<String>,
        /// Environment variable holding the API key
        #[arg(long)]
        api_key_env: Option<String>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Make a context the default for later commands
    UseContext { name: String },
    /// Print the name of the default context
    CurrentContext,
    /// List all contexts
    ListContexts,
    /// Remove a context by name
    DeleteContext { name: String },
}

pub fn run(cmd: ConfigCommands) -> Result<()> {
    let path = config_path();
    let mut cfg = load_config(&path)?;

    match cmd {
        ConfigCommands::SetContext {
            name,
            api_root,
            api_key_env,
            timeout_secs,
        } => {
            let mut ctx = cfg
                .find_context(&name)
                .cloned()
                .unwrap_or_else(|| ContextConfig::new(&name));
            if let Some(root) = api_root {
                ctx.api_root = root;
            }
            if let Some(var) = api_key_env {
                ctx.api_key_env = Some(var);
            }
            if let Some(secs) = timeout_secs {
                ctx.timeout_secs = secs;
            }
            cfg.upsert_context(ctx);
            if cfg.current_context.is_none() {
                cfg.current_context = Some(name.clone());
            }
            save_config(&cfg, &path)?;
            println!("context '{name}' saved");
        }
        ConfigCommands::UseContext { name } => {
            if cfg.find_context(&name).is_none() {
                return Err(anyhow!(
                    "context '{}' not found. Available contexts: {}",
                    name,
                    cfg.context_names().join(", ")
                ));
            }
            cfg.current_context = Some(name.clone());
            save_config(&cfg, &path)?;
            println!("switched to context '{name}'");
        }
        ConfigCommands::CurrentContext => match &cfg.current_context {
            Some(name) => println!("{name}"),
            None => println!("(no current context)"),
        },
        ConfigCommands::ListContexts => {
            if cfg.contexts.is_empty() {
                println!("(no contexts defined)");
            } else {
                for c in &cfg.contexts {
                    let marker = if cfg.current_context.as_deref() == Some(c.name.as_str()) {
                        "*"
                    } else {
                        " "
                    };
                    println!("{marker} {} → {}", c.name, c.api_root);
                }
            }
        }
        ConfigCommands::DeleteContext { name } => {
            if cfg.remove_context(&name) {
                save_config(&cfg, &path)?;
                println!("removed '{name}'");
            } else {
                println!("no such context '{name}'");
            }
        }
    }

    Ok(())
}
