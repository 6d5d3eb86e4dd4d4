//! ct-core - Core library for comment-tree
//!
//! This crate turns a flat collection of comments, each naming the comment it
//! replies to, into an ordered forest of nested reply threads. It also
//! provides validation, traversal and JSON export of the result.
//!
//! ```
//! use ct_core::comment::{build_comment_tree, records_from_str};
//! use ct_core::config::InputConfig;
//!
//! let records = records_from_str(
//!     r#"[{"id": 1, "parent_id": null}, {"id": 2, "parent_id": 1}]"#,
//!     &InputConfig::default(),
//! )?;
//! let forest = build_comment_tree(&records)?;
//! assert_eq!(forest.len(), 1);
//! assert_eq!(forest[0].reply_count(), 1);
//! # Ok::<(), ct_core::TreeError>(())
//! ```

pub mod error;
pub mod types;
pub mod config;
pub mod comment;
pub mod export;

pub use error::{TreeError, Result};
pub use types::*;
