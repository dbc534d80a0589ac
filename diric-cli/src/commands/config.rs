//! `diric config` - inspect configuration

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use diric_server::DiricConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML (password redacted)
    Show,
    /// Check the configuration without starting the server
    Validate,
}

pub fn run_config(args: ConfigArgs, path: Option<&Path>) -> Result<()> {
    let config = DiricConfig::load(path).context("Failed to load configuration")?;

    match args.command {
        ConfigCommands::Show => {
            let toml_str = config
                .redacted()
                .to_toml()
                .context("Failed to serialize config to TOML")?;
            println!("{}", toml_str);
        }
        ConfigCommands::Validate => {
            config.validate().context("Invalid configuration")?;
            println!("Configuration is valid");
        }
    }
    Ok(())
}
