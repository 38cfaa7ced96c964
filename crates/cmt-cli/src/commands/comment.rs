//! Single-comment commands
//!
//! Create, edit, moderate and delete individual comments.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use super::output;
use super::Workspace;
use cmt_core::{CommentBuilder, CommentFields, CommentId, MorphRef};

/// Author options shared by `add` and `reply`
#[derive(Debug, Args)]
pub struct AuthorArgs {
    /// Registered commenter, as TYPE:ID
    #[arg(long, conflicts_with_all = ["guest_name", "guest_email"])]
    pub by: Option<MorphRef>,

    /// Guest author name
    #[arg(long)]
    pub guest_name: Option<String>,

    /// Guest author email
    #[arg(long, requires = "guest_name")]
    pub guest_email: Option<String>,

    /// Extra fillable fields as a JSON object; unknown keys are ignored
    #[arg(long)]
    pub fields: Option<String>,
}

impl AuthorArgs {
    fn apply(self, mut builder: CommentBuilder) -> Result<CommentBuilder> {
        if let Some(fields) = self.fields {
            builder = builder.fill(parse_fields(&fields)?);
        }
        if let Some(by) = self.by {
            builder = builder.by(by);
        }
        if let Some(name) = self.guest_name {
            builder = builder.guest(name, self.guest_email);
        }
        Ok(builder)
    }
}

/// Arguments for `add`
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Content to comment on, as TYPE:ID
    #[arg(long)]
    pub on: MorphRef,

    #[command(flatten)]
    pub author: AuthorArgs,

    /// Mark approved regardless of the configured default
    #[arg(long)]
    pub approved: bool,

    /// Mark featured
    #[arg(long)]
    pub featured: bool,

    /// Comment text
    pub text: Option<String>,
}

/// Arguments for `reply`
#[derive(Debug, Args)]
pub struct ReplyArgs {
    /// Comment being replied to
    pub parent: CommentId,

    #[command(flatten)]
    pub author: AuthorArgs,

    /// Reply text
    pub text: Option<String>,
}

/// Arguments for `edit`
#[derive(Debug, Args)]
pub struct EditArgs {
    /// Comment to edit
    pub id: CommentId,

    /// New comment text
    #[arg(long)]
    pub text: Option<String>,

    /// Fillable fields as a JSON object; unknown keys are ignored
    #[arg(long)]
    pub fields: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// A single comment id
#[derive(Debug, Args)]
pub struct IdArgs {
    /// Comment id
    pub id: CommentId,
}

/// Arguments for `feature`
#[derive(Debug, Args)]
pub struct FeatureArgs {
    /// Comment id
    pub id: CommentId,

    /// Remove the featured flag instead
    #[arg(long)]
    pub off: bool,
}

/// Arguments for `delete`
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Comment id
    pub id: CommentId,

    /// Remove permanently, even when soft deletes are enabled
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `show`
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Comment id
    pub id: CommentId,

    /// Include soft-deleted comments
    #[arg(long)]
    pub with_trashed: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_fields(raw: &str) -> Result<CommentFields> {
    let value: serde_json::Value =
        serde_json::from_str(raw).context("--fields must be a JSON object")?;
    Ok(CommentFields::from_json(value)?)
}

pub fn add(workspace: &Workspace, args: AddArgs) -> Result<()> {
    let mut comments = workspace.comments()?;

    let mut builder = args.author.apply(CommentBuilder::on(args.on))?;
    if let Some(text) = args.text {
        builder = builder.content(text);
    }
    let mut fields = CommentFields::new();
    if args.approved {
        fields = fields.approved(true);
    }
    if args.featured {
        fields = fields.featured(true);
    }
    if !fields.is_empty() {
        builder = builder.fill(fields);
    }

    let comment = comments.create(builder)?;
    workspace.commit(&comments)?;

    output::done("Created comment", &comment);
    Ok(())
}

pub fn reply(workspace: &Workspace, args: ReplyArgs) -> Result<()> {
    let mut comments = workspace.comments()?;

    let target = match comments.find(&args.parent) {
        Some(parent) => parent.commentable.clone(),
        None => bail!("No live comment {} to reply to", args.parent),
    };

    let mut builder = args.author.apply(CommentBuilder::on(target))?;
    if let Some(text) = args.text {
        builder = builder.content(text);
    }

    let comment = comments.reply(&args.parent, builder)?;
    workspace.commit(&comments)?;

    output::done("Replied with comment", &comment);
    Ok(())
}

pub fn edit(workspace: &Workspace, args: EditArgs) -> Result<()> {
    let mut fields = match &args.fields {
        Some(raw) => parse_fields(raw)?,
        None => CommentFields::new(),
    };
    if let Some(text) = args.text {
        fields = fields.comment(text);
    }
    if fields.is_empty() {
        bail!("Nothing to change; pass --text or --fields");
    }

    let mut comments = workspace.comments()?;
    let comment = comments.update(&args.id, fields)?;
    workspace.commit(&comments)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&comment)?);
    } else {
        output::done("Updated comment", &comment);
    }
    Ok(())
}

pub fn set_approval(workspace: &Workspace, args: IdArgs, approved: bool) -> Result<()> {
    let mut comments = workspace.comments()?;
    let comment = comments.update(&args.id, CommentFields::new().approved(approved))?;
    workspace.commit(&comments)?;

    let action = if approved { "Approved" } else { "Unapproved" };
    output::done(action, &comment);
    Ok(())
}

pub fn feature(workspace: &Workspace, args: FeatureArgs) -> Result<()> {
    let mut comments = workspace.comments()?;
    let comment = comments.update(&args.id, CommentFields::new().featured(!args.off))?;
    workspace.commit(&comments)?;

    let action = if args.off { "Unfeatured" } else { "Featured" };
    output::done(action, &comment);
    Ok(())
}

pub fn delete(workspace: &Workspace, args: DeleteArgs) -> Result<()> {
    let mut comments = workspace.comments()?;

    let comment = if args.force {
        comments.force_delete(&args.id)?
    } else {
        comments.delete(&args.id)?
    };
    workspace.commit(&comments)?;

    let action = if comment.is_trashed() {
        "Trashed"
    } else {
        "Permanently deleted"
    };
    output::done(action, &comment);
    Ok(())
}

pub fn restore(workspace: &Workspace, args: IdArgs) -> Result<()> {
    let mut comments = workspace.comments()?;
    let comment = comments.restore(&args.id)?;
    workspace.commit(&comments)?;

    output::done("Restored", &comment);
    Ok(())
}

pub fn show(workspace: &Workspace, args: ShowArgs) -> Result<()> {
    let comments = workspace.comments()?;

    let found = if args.with_trashed {
        comments.find_with_trashed(&args.id)
    } else {
        comments.find(&args.id)
    };
    let Some(comment) = found else {
        bail!("Comment not found: {}", args.id);
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(comment)?);
    } else {
        output::print_detail(comment, &comments.url(comment));

        let replies = comments.children(&comment.id);
        if !replies.is_empty() {
            println!();
            println!("{} ({})", "Replies".bold(), replies.len());
            for reply in replies {
                output::print_line(reply, 1);
            }
        }
    }
    Ok(())
}

pub fn top(workspace: &Workspace, args: IdArgs) -> Result<()> {
    let comments = workspace.comments()?;
    let root = comments.top_comment(&args.id)?;

    output::print_line(root, 0);
    Ok(())
}
