//! # postmanctl
//!
//! A command-line client for the Postman API.
//!
//! ## Quick Start
//!
//! ```bash
//! # Point a context at your account
//! postmanctl config set-context work --api-key-env POSTMAN_API_KEY
//!
//! # Fetch a collection by name, without volatile keys
//! postmanctl get collection "Orders API" -i id,uid,owner > orders.json
//!
//! # Review the diff and confirm before overwriting
//! postmanctl replace collection "Orders API" -f orders.json --mode compare -i id,uid,owner
//! ```

use anyhow::Result;
use clap::Parser;
use postmanctl::{commands, logging, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    let cmd = cli.cmd.unwrap_or_else(|| {
        eprintln!("No command provided. Use --help to see available commands.");
        std::process::exit(1);
    });
    let globals = commands::GlobalOpts {
        context: cli.context,
    };
    commands::run(cmd, &globals).await
}
