//! comment-tree - nested comment thread builder
//!
//! Turns flat comment lists, where each comment names the one it replies
//! to, into nested reply threads.
//!
//! ## Quick Start
//!
//! ```bash
//! # Build nested threads from an API response
//! comment-tree build comments.json -o threads.json
//!
//! # Look for duplicate ids, dangling parents and cycles
//! comment-tree check comments.json
//!
//! # Go back to a flat list
//! comment-tree flatten threads.json
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
