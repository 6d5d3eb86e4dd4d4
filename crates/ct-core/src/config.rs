//! Configuration management for comment-tree

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input settings
    pub input: InputConfig,
    /// Output settings
    pub output: OutputConfig,
}

/// How the input collection is read
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Name of the identifier field
    pub id_field: String,
    /// Name of the parent identifier field
    pub parent_field: String,
    /// Key holding the array when the document is an envelope object
    pub collection_key: String,
    /// Which parent values mean "top-level comment"
    pub root_sentinel: RootSentinel,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            id_field: "id".to_string(),
            parent_field: "parent_id".to_string(),
            collection_key: "data".to_string(),
            root_sentinel: RootSentinel::Null,
        }
    }
}

/// Parent values treated as "no parent"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootSentinel {
    /// Missing field or `null`
    #[default]
    Null,
    /// Missing field, `null`, `0`, `""` or `false`
    Falsy,
}

impl std::fmt::Display for RootSentinel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RootSentinel::Null => write!(f, "null"),
            RootSentinel::Falsy => write!(f, "falsy"),
        }
    }
}

/// How the nested forest is written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Name of the field holding a node's replies
    pub replies_field: String,
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            replies_field: "replies".to_string(),
            pretty: true,
        }
    }
}
