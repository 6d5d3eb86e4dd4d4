//! Nested comment tree construction

use super::index::ReplyIndex;
use super::model::{CommentForest, CommentNode, ThreadedComment};
use crate::error::{Result, TreeError};
use crate::types::CommentId;
use tracing::debug;

/// Build a threaded forest from a flat comment collection
///
/// The input is left untouched; every node wraps a clone of its record.
/// Fails only when two records share an identifier.
pub fn build_comment_tree<T>(records: &[T]) -> Result<CommentForest<T>>
where
    T: ThreadedComment + Clone,
{
    CommentTreeBuilder::from_records(records.to_vec())
        .build()
        .map(|tree| tree.forest)
}

/// Builder turning flat comments into a nested forest
#[derive(Debug, Clone)]
pub struct CommentTreeBuilder<T> {
    records: Vec<T>,
}

/// A built forest with notes on how it was assembled
#[derive(Debug)]
pub struct BuiltTree<T> {
    /// The nested comments
    pub forest: CommentForest<T>,
    /// Records that needed special placement
    pub report: BuildReport,
}

/// Records placed at top level for a reason other than having no parent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Records whose parent is not in the collection
    pub orphans: Vec<CommentId>,
    /// Records promoted to top level to cut a parent cycle
    pub cycle_broken: Vec<CommentId>,
}

impl BuildReport {
    /// Whether every record was placed by its own parent reference
    pub fn is_clean(&self) -> bool {
        self.orphans.is_empty() && self.cycle_broken.is_empty()
    }
}

impl<T: ThreadedComment> CommentTreeBuilder<T> {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Create a builder owning an existing collection
    pub fn from_records(records: Vec<T>) -> Self {
        Self { records }
    }

    /// Add a comment
    pub fn push(mut self, record: T) -> Self {
        self.records.push(record);
        self
    }

    /// Add several comments
    pub fn extend(mut self, records: impl IntoIterator<Item = T>) -> Self {
        self.records.extend(records);
        self
    }

    /// Link the collected comments into a forest
    pub fn build(self) -> Result<BuiltTree<T>> {
        let index = ReplyIndex::build(&self.records);

        if let Some(&pos) = index.duplicates().first() {
            return Err(TreeError::DuplicateId(
                self.records[pos].comment_id().to_string(),
            ));
        }

        let layout = index.layout();
        let report = BuildReport {
            orphans: ids_at(&self.records, index.orphans()),
            cycle_broken: ids_at(&self.records, &layout.cycle_broken),
        };

        if !report.orphans.is_empty() {
            debug!(
                count = report.orphans.len(),
                "Comments reference missing parents; placing them at top level"
            );
        }
        if !report.cycle_broken.is_empty() {
            debug!(
                ids = ?report.cycle_broken,
                "Comment parent chains loop; promoting cycle members to top level"
            );
        }

        let mut slots: Vec<Option<CommentNode<T>>> = self
            .records
            .into_iter()
            .map(|record| Some(CommentNode::new(record)))
            .collect();

        // Replies follow their parent in pre-order, so walking it backwards
        // finishes every child before the parent collects it.
        for &pos in layout.preorder.iter().rev() {
            let replies: Vec<CommentNode<T>> = index
                .children(pos)
                .iter()
                .filter(|&&child| layout.attached[child])
                .filter_map(|&child| slots[child].take())
                .collect();

            if let Some(node) = slots[pos].as_mut() {
                node.replies = replies;
            }
        }

        let roots: Vec<CommentNode<T>> = layout
            .top
            .iter()
            .filter_map(|&pos| slots[pos].take())
            .collect();

        debug!(
            records = index.len(),
            roots = roots.len(),
            "Built comment tree"
        );

        Ok(BuiltTree {
            forest: CommentForest::from_roots(roots),
            report,
        })
    }
}

impl<T: ThreadedComment> Default for CommentTreeBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn ids_at<T: ThreadedComment>(records: &[T], positions: &[usize]) -> Vec<CommentId> {
    positions
        .iter()
        .map(|&pos| records[pos].comment_id().clone())
        .collect()
}
