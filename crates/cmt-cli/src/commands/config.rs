//! Config command
//!
//! Show or create the comments configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::Path;

use cmt_core::CommentsConfig;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, config_path: &Path) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(config_path, json),
        ConfigCommand::Init { force } => init_config(config_path, force),
    }
}

fn show_config(config_path: &Path, as_json: bool) -> Result<()> {
    let config = CommentsConfig::load(config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    if config_path.exists() {
        println!("{}", config_path.display().to_string().dimmed());
    } else {
        println!(
            "{} {} not found, showing defaults. Run '{}' to create.",
            "⚠".yellow(),
            config_path.display(),
            "cmt config init".cyan()
        );
    }
    println!();
    println!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        eprintln!(
            "{} {} already exists. Use {} to overwrite.",
            "⚠".yellow(),
            config_path.display(),
            "--force".cyan()
        );
        return Ok(());
    }

    CommentsConfig::default()
        .save(config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!(
        "{} Configuration written to {}",
        "✓".green(),
        config_path.display()
    );
    Ok(())
}
