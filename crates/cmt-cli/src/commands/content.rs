//! Commands over all comments on one piece of content

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::output;
use super::Workspace;
use cmt_core::{MorphRef, Scope};

/// Arguments for `list`
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Content whose comments to list, as TYPE:ID
    #[arg(long)]
    pub on: MorphRef,

    /// Only approved comments
    #[arg(long, conflicts_with_all = ["with_trashed", "only_trashed"])]
    pub approved: bool,

    /// Include soft-deleted comments
    #[arg(long, conflicts_with = "only_trashed")]
    pub with_trashed: bool,

    /// Only soft-deleted comments
    #[arg(long)]
    pub only_trashed: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    fn scope(&self) -> Scope {
        if self.with_trashed {
            Scope::WithTrashed
        } else if self.only_trashed {
            Scope::OnlyTrashed
        } else {
            Scope::Default
        }
    }
}

/// Arguments for `thread`
#[derive(Debug, Args)]
pub struct ThreadArgs {
    /// Content whose threads to show, as TYPE:ID
    #[arg(long)]
    pub on: MorphRef,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `purge`
#[derive(Debug, Args)]
pub struct PurgeArgs {
    /// Content the host has deleted, as TYPE:ID
    #[arg(long)]
    pub on: MorphRef,

    /// Output the cascade report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn list(workspace: &Workspace, args: ListArgs) -> Result<()> {
    let comments = workspace.comments()?;

    let found = if args.approved {
        comments.approved_comments_on(&args.on)
    } else {
        comments.comments_on(&args.on, args.scope())
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    if found.is_empty() {
        println!("No comments on {}", args.on.to_string().cyan());
        return Ok(());
    }

    println!(
        "{} {} ({})",
        "Comments on".bold().underline(),
        args.on.to_string().cyan(),
        found.len()
    );
    for comment in found {
        output::print_line(comment, 0);
    }
    Ok(())
}

pub fn thread(workspace: &Workspace, args: ThreadArgs) -> Result<()> {
    let comments = workspace.comments()?;
    let thread = comments.thread_on(&args.on);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&thread)?);
        return Ok(());
    }

    if thread.is_empty() {
        println!("No comments on {}", args.on.to_string().cyan());
        return Ok(());
    }

    output::print_thread(&thread);
    Ok(())
}

pub fn purge(workspace: &Workspace, args: PurgeArgs) -> Result<()> {
    let mut comments = workspace.comments()?;
    let report = comments.cascade_delete(&args.on);
    workspace.commit(&comments)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.count() == 0 {
        println!("{} Nothing to purge on {}", "⚠".yellow(), args.on);
    } else {
        println!(
            "{} {} {} comment(s) on {}",
            "✓".green(),
            match report.mode {
                cmt_core::CascadeMode::Soft => "Trashed",
                cmt_core::CascadeMode::Hard => "Removed",
            },
            report.count(),
            args.on
        );
    }
    Ok(())
}
