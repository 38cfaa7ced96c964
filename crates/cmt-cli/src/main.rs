//! cmt - moderate a polymorphic comment table
//!
//! ## Quick Start
//!
//! ```bash
//! # Comment on a piece of content
//! cmt add --on Article:42 --by User:7 "Great read"
//!
//! # Reply as a guest
//! cmt reply <comment-id> --guest-name Jane "Agreed"
//!
//! # Moderate
//! cmt approve <comment-id>
//! cmt thread --on Article:42
//!
//! # The host removed Article 42
//! cmt purge --on Article:42
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
