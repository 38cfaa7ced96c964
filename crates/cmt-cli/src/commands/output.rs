//! Terminal rendering of comments

use cmt_core::{Comment, Thread};
use colored::Colorize;

/// Short form of a comment id for listings
pub fn short_id(comment: &Comment) -> String {
    comment.id.to_string().chars().take(8).collect()
}

fn flags(comment: &Comment) -> String {
    let mut flags = Vec::new();
    if comment.approved {
        flags.push("approved".green().to_string());
    } else {
        flags.push("pending".yellow().to_string());
    }
    if comment.is_featured {
        flags.push("★ featured".magenta().to_string());
    }
    if comment.is_trashed() {
        flags.push("trashed".red().to_string());
    }
    flags.join(" ")
}

/// One-line summary, indented by `depth`
pub fn print_line(comment: &Comment, depth: usize) {
    let indent = "  ".repeat(depth);
    let body = comment.comment.lines().next().unwrap_or("");
    println!(
        "{}{} {} {} {}",
        indent,
        short_id(comment).dimmed(),
        comment.author_label().cyan(),
        flags(comment),
        body
    );
}

/// Full view of one comment
pub fn print_detail(comment: &Comment, url: &str) {
    println!("{}", "Comment:".bold().underline());
    println!("  ID:          {}", comment.id);
    println!("  On:          {}", comment.commentable.to_string().cyan());
    println!("  Author:      {}", comment.author_label());
    if let Some(email) = &comment.guest_email {
        println!("  Email:       {}", email);
    }
    if let Some(parent) = &comment.parent_id {
        println!("  Reply to:    {}", parent);
    }
    println!("  Status:      {}", flags(comment));
    println!(
        "  Created:     {}",
        comment.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "  Updated:     {}",
        comment.updated_at.format("%Y-%m-%d %H:%M:%S")
    );
    if let Some(deleted_at) = comment.deleted_at {
        println!("  Deleted:     {}", deleted_at.format("%Y-%m-%d %H:%M:%S"));
    }
    println!("  URL:         {}", url.dimmed());
    println!();
    println!("{}", comment.comment);
}

/// Nested thread, replies indented under their parent
pub fn print_thread(thread: &Thread<'_>) {
    for node in thread.iter() {
        print_line(node.comment, node.depth);
    }
}

/// Confirmation line after a write
pub fn done(action: &str, comment: &Comment) {
    println!("{} {} {}", "✓".green(), action, comment.id);
}
