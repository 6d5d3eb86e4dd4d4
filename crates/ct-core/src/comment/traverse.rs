//! Forest traversal and statistics

use super::model::{CommentForest, CommentNode, ThreadedComment};
use crate::types::CommentId;
use serde::{Deserialize, Serialize};

/// A node visited during depth-first traversal
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a, T> {
    /// Nesting level, 0 for top-level comments
    pub depth: usize,
    /// The visited node
    pub node: &'a CommentNode<T>,
}

/// Depth-first pre-order iterator over a forest
pub struct DepthFirst<'a, T> {
    stack: Vec<Visit<'a, T>>,
}

impl<'a, T> DepthFirst<'a, T> {
    fn new(roots: &'a [CommentNode<T>]) -> Self {
        let stack = roots
            .iter()
            .rev()
            .map(|node| Visit { depth: 0, node })
            .collect();
        Self { stack }
    }
}

impl<'a, T> Iterator for DepthFirst<'a, T> {
    type Item = Visit<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let visit = self.stack.pop()?;
        self.stack.extend(visit.node.replies.iter().rev().map(|node| Visit {
            depth: visit.depth + 1,
            node,
        }));
        Some(visit)
    }
}

impl<T> CommentForest<T> {
    /// Iterate every node in depth-first pre-order
    pub fn iter(&self) -> DepthFirst<'_, T> {
        DepthFirst::new(self.roots())
    }

    /// Borrow every comment in depth-first pre-order
    pub fn flatten(&self) -> Vec<&T> {
        self.iter().map(|visit| &visit.node.comment).collect()
    }

    /// Total number of nodes at any depth
    pub fn total(&self) -> usize {
        self.iter().count()
    }

    /// Summary statistics
    pub fn stats(&self) -> TreeStats {
        TreeStats::from_forest(self)
    }
}

impl<T: ThreadedComment> CommentForest<T> {
    /// Find a node anywhere in the forest
    pub fn find(&self, id: &CommentId) -> Option<&CommentNode<T>> {
        self.iter()
            .map(|visit| visit.node)
            .find(|node| node.id() == id)
    }
}

/// Shape statistics of a forest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Number of comments
    pub total: usize,
    /// Number of top-level comments
    pub roots: usize,
    /// Number of comments without replies
    pub leaves: usize,
    /// Number of nesting levels (0 when empty)
    pub max_depth: usize,
    /// Largest number of direct replies on one comment
    pub max_replies: usize,
}

impl TreeStats {
    /// Compute statistics for a forest
    pub fn from_forest<T>(forest: &CommentForest<T>) -> Self {
        let mut stats = TreeStats {
            roots: forest.len(),
            ..Default::default()
        };

        for visit in forest.iter() {
            stats.total += 1;
            stats.max_depth = stats.max_depth.max(visit.depth + 1);
            stats.max_replies = stats.max_replies.max(visit.node.reply_count());
            if visit.node.is_leaf() {
                stats.leaves += 1;
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::builder::build_comment_tree;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Reply {
        id: CommentId,
        parent: Option<CommentId>,
    }

    impl ThreadedComment for Reply {
        fn comment_id(&self) -> &CommentId {
            &self.id
        }

        fn parent_id(&self) -> Option<&CommentId> {
            self.parent.as_ref()
        }
    }

    fn forest(pairs: &[(i64, Option<i64>)]) -> CommentForest<Reply> {
        let records: Vec<Reply> = pairs
            .iter()
            .map(|&(id, parent)| Reply {
                id: CommentId::from(id),
                parent: parent.map(CommentId::from),
            })
            .collect();
        build_comment_tree(&records).unwrap()
    }

    #[test]
    fn test_depth_first_order_and_depths() {
        let forest = forest(&[(1, None), (2, Some(1)), (3, Some(1)), (4, Some(2)), (5, None)]);
        let visits: Vec<(i64, usize)> = forest
            .iter()
            .map(|v| match v.node.id() {
                CommentId::Int(n) => (*n, v.depth),
                other => panic!("unexpected id {}", other),
            })
            .collect();
        assert_eq!(visits, vec![(1, 0), (2, 1), (4, 2), (3, 1), (5, 0)]);
    }

    #[test]
    fn test_flatten_counts_every_record_once() {
        let forest = forest(&[(3, Some(1)), (1, None), (2, Some(3)), (9, Some(8))]);
        let ids: Vec<&CommentId> = forest.flatten().into_iter().map(|r| &r.id).collect();
        assert_eq!(
            ids,
            vec![
                &CommentId::Int(1),
                &CommentId::Int(3),
                &CommentId::Int(2),
                &CommentId::Int(9)
            ]
        );
        assert_eq!(forest.total(), 4);
    }

    #[test]
    fn test_find() {
        let forest = forest(&[(1, None), (2, Some(1)), (3, Some(2))]);
        let found = forest.find(&CommentId::Int(3)).unwrap();
        assert_eq!(found.comment.parent, Some(CommentId::Int(2)));
        assert!(forest.find(&CommentId::Int(4)).is_none());
    }

    #[test]
    fn test_stats() {
        let forest = forest(&[
            (1, None),
            (2, Some(1)),
            (3, Some(1)),
            (4, Some(1)),
            (5, Some(2)),
            (6, None),
        ]);
        assert_eq!(
            forest.stats(),
            TreeStats {
                total: 6,
                roots: 2,
                leaves: 4,
                max_depth: 3,
                max_replies: 3,
            }
        );
    }

    #[test]
    fn test_stats_empty() {
        let forest = forest(&[]);
        assert_eq!(forest.stats(), TreeStats::default());
    }
}
