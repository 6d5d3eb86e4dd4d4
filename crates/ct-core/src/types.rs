//! Core type definitions for comment-tree

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of a comment
///
/// Comments coming out of a relational store usually carry integer keys,
/// while document stores and UUID-keyed tables use strings. Both are opaque
/// here: only equality and hashing matter. `Int(7)` and `Str("7")` are
/// different identifiers. Unsigned keys only use `UInt` when they do not
/// fit in `i64`, so each number has exactly one representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommentId {
    /// Integer key
    Int(i64),
    /// Unsigned integer key above `i64::MAX`
    UInt(u64),
    /// String key
    Str(String),
}

impl CommentId {
    /// Extract an identifier from a JSON value
    ///
    /// Returns `None` for anything that is not an integer or a string.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(CommentId::Int)
                .or_else(|| n.as_u64().map(CommentId::UInt)),
            Value::String(s) => Some(CommentId::Str(s.clone())),
            _ => None,
        }
    }

    /// Whether this identifier is `0` or the empty string
    pub fn is_falsy(&self) -> bool {
        match self {
            CommentId::Int(n) => *n == 0,
            CommentId::UInt(n) => *n == 0,
            CommentId::Str(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentId::Int(n) => write!(f, "{}", n),
            CommentId::UInt(n) => write!(f, "{}", n),
            CommentId::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<i64> for CommentId {
    fn from(n: i64) -> Self {
        CommentId::Int(n)
    }
}

impl From<&str> for CommentId {
    fn from(s: &str) -> Self {
        CommentId::Str(s.to_string())
    }
}

impl From<String> for CommentId {
    fn from(s: String) -> Self {
        CommentId::Str(s)
    }
}
