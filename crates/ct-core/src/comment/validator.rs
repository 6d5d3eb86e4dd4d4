//! Comment collection validation

use super::index::ReplyIndex;
use super::model::ThreadedComment;
use crate::types::CommentId;
use serde::{Deserialize, Serialize};

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// The collection is still usable; the record lands at top level
    Warning,
    /// The collection cannot be built into a tree
    Error,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Warning => write!(f, "warning"),
            Level::Error => write!(f, "error"),
        }
    }
}

/// What is wrong with a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Problem {
    /// Identifier already used by an earlier record
    DuplicateId { first_position: usize },
    /// Parent identifier matches no record
    DanglingParent { parent_id: CommentId },
    /// Record names itself as parent
    SelfReference,
    /// Record's ancestor chain loops back on itself
    Cycle { members: Vec<CommentId> },
}

impl Problem {
    /// Severity of this problem
    pub fn level(&self) -> Level {
        match self {
            Problem::DuplicateId { .. } => Level::Error,
            _ => Level::Warning,
        }
    }
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Problem::DuplicateId { first_position } => {
                write!(f, "duplicate id, first used at position {}", first_position)
            }
            Problem::DanglingParent { parent_id } => {
                write!(f, "parent {} is not in the collection", parent_id)
            }
            Problem::SelfReference => write!(f, "replies to itself"),
            Problem::Cycle { members } => {
                let chain: Vec<String> = members.iter().map(|id| id.to_string()).collect();
                write!(f, "parent chain loops: {}", chain.join(" -> "))
            }
        }
    }
}

/// A problem found on one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Position of the record in the input
    pub position: usize,
    /// Identifier of the record
    pub id: CommentId,
    /// What is wrong
    #[serde(flatten)]
    pub problem: Problem,
}

impl Diagnostic {
    /// Severity of this diagnostic
    pub fn level(&self) -> Level {
        self.problem.level()
    }
}

/// All problems found in a collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Number of records checked
    pub checked: usize,
    /// Problems, ordered by position
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    /// Whether any problem prevents building a tree
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level() == Level::Error)
    }

    /// Number of diagnostics at a level
    pub fn count(&self, level: Level) -> usize {
        self.diagnostics.iter().filter(|d| d.level() == level).count()
    }

    /// Whether nothing was found
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Validator for flat comment collections
///
/// Reports the same conditions the tree builder works around (or rejects)
/// without building anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadValidator;

impl ThreadValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Check a collection
    pub fn validate<T: ThreadedComment>(&self, records: &[T]) -> ValidationReport {
        let index = ReplyIndex::build(records);
        let mut diagnostics = Vec::new();

        for &pos in index.duplicates() {
            let id = records[pos].comment_id();
            let first_position = index.position(id).unwrap_or(pos);
            diagnostics.push(Diagnostic {
                position: pos,
                id: id.clone(),
                problem: Problem::DuplicateId { first_position },
            });
        }

        for &pos in index.orphans() {
            let record = &records[pos];
            if let Some(parent_id) = record.parent_id() {
                diagnostics.push(Diagnostic {
                    position: pos,
                    id: record.comment_id().clone(),
                    problem: Problem::DanglingParent {
                        parent_id: parent_id.clone(),
                    },
                });
            }
        }

        for &pos in &index.layout().cycle_broken {
            let id = records[pos].comment_id().clone();
            let problem = if index.parent(pos) == Some(pos) {
                Problem::SelfReference
            } else {
                Problem::Cycle {
                    members: cycle_members(&index, records, pos),
                }
            };
            diagnostics.push(Diagnostic {
                position: pos,
                id,
                problem,
            });
        }

        diagnostics.sort_by_key(|d| d.position);

        ValidationReport {
            checked: records.len(),
            diagnostics,
        }
    }
}

fn cycle_members<T: ThreadedComment>(
    index: &ReplyIndex,
    records: &[T],
    start: usize,
) -> Vec<CommentId> {
    let mut members = vec![records[start].comment_id().clone()];
    let mut pos = start;

    while let Some(parent) = index.parent(pos) {
        if parent == start || members.len() > records.len() {
            break;
        }
        members.push(records[parent].comment_id().clone());
        pos = parent;
    }

    members.push(records[start].comment_id().clone());
    members
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Entry {
        id: CommentId,
        parent: Option<CommentId>,
    }

    impl ThreadedComment for Entry {
        fn comment_id(&self) -> &CommentId {
            &self.id
        }

        fn parent_id(&self) -> Option<&CommentId> {
            self.parent.as_ref()
        }
    }

    fn entries(pairs: &[(&str, Option<&str>)]) -> Vec<Entry> {
        pairs
            .iter()
            .map(|&(id, parent)| Entry {
                id: CommentId::from(id),
                parent: parent.map(CommentId::from),
            })
            .collect()
    }

    #[test]
    fn test_clean_collection() {
        let report =
            ThreadValidator::new().validate(&entries(&[("a", None), ("b", Some("a"))]));
        assert!(report.is_clean());
        assert!(!report.has_errors());
        assert_eq!(report.checked, 2);
    }

    #[test]
    fn test_duplicate_is_error() {
        let report = ThreadValidator::new().validate(&entries(&[("a", None), ("a", None)]));
        assert!(report.has_errors());
        assert_eq!(
            report.diagnostics[0].problem,
            Problem::DuplicateId { first_position: 0 }
        );
        assert_eq!(report.diagnostics[0].position, 1);
    }

    #[test]
    fn test_dangling_parent_is_warning() {
        let report = ThreadValidator::new().validate(&entries(&[("a", Some("zz"))]));
        assert!(!report.has_errors());
        assert_eq!(report.count(Level::Warning), 1);
        assert_eq!(
            report.diagnostics[0].problem.to_string(),
            "parent \"zz\" is not in the collection"
        );
    }

    #[test]
    fn test_self_reference_and_cycle() {
        let report = ThreadValidator::new().validate(&entries(&[
            ("a", Some("a")),
            ("b", Some("c")),
            ("c", Some("b")),
        ]));

        assert_eq!(report.diagnostics.len(), 2);
        assert_eq!(report.diagnostics[0].problem, Problem::SelfReference);
        assert_eq!(
            report.diagnostics[1].problem,
            Problem::Cycle {
                members: vec![
                    CommentId::from("b"),
                    CommentId::from("c"),
                    CommentId::from("b")
                ]
            }
        );
        assert_eq!(
            report.diagnostics[1].problem.to_string(),
            "parent chain loops: \"b\" -> \"c\" -> \"b\""
        );
    }

    #[test]
    fn test_report_serialization() {
        let report = ThreadValidator::new().validate(&entries(&[("a", Some("a"))]));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["diagnostics"][0]["kind"], "self_reference");
        assert_eq!(json["diagnostics"][0]["id"], "a");
    }
}
