//! `diric serve` - run the HTTP server
//!
//! Flags override the config file and environment.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use diric_server::{
    run_server, Database, DatabaseConfig, DiricConfig, MemoryDatabase, PgDatabase,
};

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Host to bind to (default: localhost)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (default: 8000)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Database URL (overrides database.* settings)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Show error detail on the error page
    #[arg(long)]
    pub development: bool,

    /// Shut down on the first database error
    #[arg(long)]
    pub fail_fast: bool,

    /// Serve static files from this directory
    #[arg(long, value_name = "DIR")]
    pub static_dir: Option<PathBuf>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Keep employees in memory instead of PostgreSQL (lost on exit)
    #[arg(long)]
    pub memory: bool,
}

impl ServeArgs {
    /// Fold flags into `config`; unset flags leave it alone
    fn apply(self, config: &mut DiricConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = self.database_url.filter(|url| !url.is_empty()) {
            config.database.url = Some(url);
        }
        if let Some(dir) = self.static_dir {
            config.server.static_dir = Some(dir);
        }
        config.server.development |= self.development;
        config.server.fail_fast |= self.fail_fast;
        config.server.cors_permissive |= self.cors_permissive;
    }
}

/// Run the HTTP server until shutdown
pub async fn run_serve(args: ServeArgs, config_path: Option<&Path>) -> Result<()> {
    let memory = args.memory;
    let mut config = DiricConfig::load(config_path).context("Failed to load configuration")?;
    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        "Starting diric server"
    );

    let db = open_database(memory, &config.database).await?;

    // Blocks until shutdown
    run_server(db, &config.server)
        .await
        .context("Server error")?;

    Ok(())
}

/// The in-memory backend when `memory` is set, PostgreSQL otherwise
async fn open_database(memory: bool, config: &DatabaseConfig) -> Result<Arc<dyn Database>> {
    if memory {
        tracing::warn!("Using in-memory storage; employees are lost on shutdown");
        return Ok(Arc::new(MemoryDatabase::new()));
    }
    let db = PgDatabase::connect(config)
        .await
        .context("Failed to create database pool")?;
    Ok(Arc::new(db))
}
