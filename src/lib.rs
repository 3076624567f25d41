//! # postmanctl
//!
//! Library behind the `postmanctl` command-line client for the Postman API.
//!
//! Besides the command wiring, it exposes the two pure building blocks of the
//! "replace with compare" workflow: [`reformat`] normalizes a fetched document
//! and [`compare`] computes a structural diff between two documents.

use clap::Parser;

pub mod client;
pub mod commands;
pub mod compare;
pub mod config;
pub mod constants;
pub mod logging;
pub mod output;
pub mod reformat;
pub mod resolve;
pub mod resources;

/// Command-line client for Postman API resources
///
/// Fetch collections, environments, monitors, mocks, workspaces, APIs, API
/// versions and schemas by name or identifier, and replace them from local
/// JSON documents, optionally after reviewing a structural diff.
#[derive(Parser)]
#[command(
    name = "postmanctl",
    version,
    about = "Command-line client for fetching and replacing Postman API resources",
    long_about = "Command-line client for fetching and replacing Postman API resources.\n\nResources can be addressed by name or identifier. Replacing in compare mode shows a\nstructural diff between the remote resource and the local document before overwriting."
)]
pub struct Cli {
    /// Context from the config file to use instead of the current one
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Log verbosity (RUST_LOG overrides it)
    #[arg(long, value_enum, global = true, default_value = "warn")]
    pub log_level: logging::LogLevel,

    #[command(subcommand)]
    pub cmd: Option<commands::Commands>,
}
