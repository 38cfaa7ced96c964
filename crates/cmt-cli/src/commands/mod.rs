//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod comment;
pub mod config;
pub mod content;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use cmt_core::{CommentEvent, CommentStorage, CommentValidator, Comments, CommentsConfig};
use cmt_storage::FileSystemStorage;

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = ".cmt/config.toml";

/// cmt - polymorphic threaded comments
#[derive(Debug, Parser)]
#[command(name = "cmt")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Comment store directory
    #[arg(long, global = true, env = "CMT_STORE")]
    pub store: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Comment on a piece of content
    Add(comment::AddArgs),

    /// Reply to a comment
    Reply(comment::ReplyArgs),

    /// Change a comment's fillable fields
    Edit(comment::EditArgs),

    /// Approve a comment
    Approve(comment::IdArgs),

    /// Withdraw approval
    Unapprove(comment::IdArgs),

    /// Feature (or unfeature) a comment
    Feature(comment::FeatureArgs),

    /// Delete a comment (soft by default, per configuration)
    Delete(comment::DeleteArgs),

    /// Restore a soft-deleted comment
    Restore(comment::IdArgs),

    /// Show one comment
    Show(comment::ShowArgs),

    /// Show the root of a comment's thread
    Top(comment::IdArgs),

    /// List comments on a piece of content
    List(content::ListArgs),

    /// Show comments on a piece of content as nested threads
    Thread(content::ThreadArgs),

    /// Cascade-delete the comments of content the host has removed
    Purge(content::PurgeArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Loaded configuration and storage for one invocation
pub struct Workspace {
    pub config: CommentsConfig,
    storage: FileSystemStorage,
}

impl Workspace {
    /// Load configuration and open the store
    pub fn open(config_path: &Path, store: Option<&Path>) -> Result<Self> {
        let config = CommentsConfig::load(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?;

        let storage = match store {
            Some(dir) => FileSystemStorage::new(dir),
            None => FileSystemStorage::default_location(),
        }
        .context("Failed to open comment store")?;

        tracing::debug!("Using store {:?}", storage.table_path());

        Ok(Self {
            config,
            storage,
        })
    }

    /// Build the comment service over the stored table
    pub fn comments(&self) -> Result<Comments> {
        let table = self.storage.load().context("Failed to load comments")?;
        let mut comments = Comments::with_table(self.config.clone(), table)
            .with_validator(CommentValidator::from_config(&self.config.validation));

        comments.subscribe(|event: &CommentEvent| {
            tracing::info!(kind = %event.kind, comment = %event.comment.id, "comment event");
        });

        Ok(comments)
    }

    /// Persist the service's table
    pub fn commit(&self, comments: &Comments) -> Result<()> {
        self.storage
            .save(comments.table())
            .context("Failed to save comments")
    }
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Config commands work without a store
    let command = match cli.command {
        Commands::Config(cmd) => return config::execute(cmd, &cli.config),
        other => other,
    };

    let workspace = Workspace::open(&cli.config, cli.store.as_deref())?;

    match command {
        Commands::Add(args) => comment::add(&workspace, args),
        Commands::Reply(args) => comment::reply(&workspace, args),
        Commands::Edit(args) => comment::edit(&workspace, args),
        Commands::Approve(args) => comment::set_approval(&workspace, args, true),
        Commands::Unapprove(args) => comment::set_approval(&workspace, args, false),
        Commands::Feature(args) => comment::feature(&workspace, args),
        Commands::Delete(args) => comment::delete(&workspace, args),
        Commands::Restore(args) => comment::restore(&workspace, args),
        Commands::Show(args) => comment::show(&workspace, args),
        Commands::Top(args) => comment::top(&workspace, args),
        Commands::List(args) => content::list(&workspace, args),
        Commands::Thread(args) => content::thread(&workspace, args),
        Commands::Purge(args) => content::purge(&workspace, args),
        Commands::Config(_) => unreachable!("handled above"),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
