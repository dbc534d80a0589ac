//! diric CLI - HTTP API for the employees table
//!
//! Entry point for the `diric` binary:
//! - `serve` runs the HTTP server against PostgreSQL
//! - `config show` prints the effective configuration
//! - `docs` prints the OpenAPI document

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "diric",
    author,
    version,
    about = "HTTP API for managing a list of employees",
    long_about = "Serve list/get/create/update/delete endpoints over the employees table, \
                  with an OpenAPI document and a docs UI under /docs."
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    /// Path to the TOML config file (default: ./diric.toml if present)
    #[arg(long, global = true, env = "DIRIC_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),
    /// Inspect the effective configuration
    Config(commands::config::ConfigArgs),
    /// Print the OpenAPI document as JSON
    Docs,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, cli.config.as_deref()).await?,
        Commands::Config(args) => commands::run_config(args, cli.config.as_deref())?,
        Commands::Docs => commands::run_docs()?,
    }
    Ok(())
}
