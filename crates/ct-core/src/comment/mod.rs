//! Comment thread module
//!
//! Turns flat comment collections into nested reply forests.

pub mod builder;
pub mod index;
pub mod model;
pub mod record;
pub mod traverse;
pub mod validator;

pub use builder::{build_comment_tree, BuildReport, BuiltTree, CommentTreeBuilder};
pub use index::{Layout, ReplyIndex};
pub use model::*;
pub use record::{parse_document, records_from_document, records_from_str, release, CommentRecord};
pub use traverse::{DepthFirst, TreeStats, Visit};
pub use validator::{Diagnostic, Level, Problem, ThreadValidator, ValidationReport};
