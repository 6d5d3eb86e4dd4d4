//! Comment tree data models

use crate::types::CommentId;
use serde::{Serialize, Serializer};
use std::ops::Deref;

/// A comment that can take part in a reply thread
///
/// Implementors expose their own identifier and the identifier of the
/// comment they reply to. Every other field is payload the tree never looks
/// at.
pub trait ThreadedComment {
    /// Identifier of this comment
    fn comment_id(&self) -> &CommentId;

    /// Identifier of the comment this one replies to, `None` for top-level
    fn parent_id(&self) -> Option<&CommentId>;
}

/// A comment together with its direct replies
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentNode<T> {
    /// The originating comment
    #[serde(flatten)]
    pub comment: T,
    /// Direct replies, in input order
    pub replies: Vec<CommentNode<T>>,
}

impl<T> CommentNode<T> {
    /// Wrap a comment with an empty reply list
    pub fn new(comment: T) -> Self {
        Self {
            comment,
            replies: Vec::new(),
        }
    }

    /// Number of direct replies
    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }

    /// Whether this node has no replies
    pub fn is_leaf(&self) -> bool {
        self.replies.is_empty()
    }

    /// Number of nodes below this one at any depth
    pub fn descendant_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&CommentNode<T>> = self.replies.iter().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.replies.iter());
        }
        count
    }
}

impl<T: ThreadedComment> CommentNode<T> {
    /// Identifier of the wrapped comment
    pub fn id(&self) -> &CommentId {
        self.comment.comment_id()
    }
}

/// Ordered forest of top-level comment nodes
///
/// Dropping a forest dismantles it with an explicit stack, so a reply chain
/// of any depth is released without recursion.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentForest<T> {
    roots: Vec<CommentNode<T>>,
}

impl<T> CommentForest<T> {
    /// Create a forest from already linked root nodes
    pub fn from_roots(roots: Vec<CommentNode<T>>) -> Self {
        Self { roots }
    }

    /// Create an empty forest
    pub fn empty() -> Self {
        Self { roots: Vec::new() }
    }

    /// Top-level nodes
    pub fn roots(&self) -> &[CommentNode<T>] {
        &self.roots
    }

    /// Move every comment out in depth-first pre-order
    ///
    /// Rebuilding a tree from the result yields an equal forest.
    pub fn into_records(mut self) -> Vec<T> {
        let mut records = Vec::new();
        let mut stack = std::mem::take(&mut self.roots);
        stack.reverse();

        while let Some(node) = stack.pop() {
            let CommentNode {
                comment,
                mut replies,
            } = node;
            records.push(comment);
            replies.reverse();
            stack.append(&mut replies);
        }

        records
    }
}

impl<T> Default for CommentForest<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Deref for CommentForest<T> {
    type Target = [CommentNode<T>];

    fn deref(&self) -> &Self::Target {
        &self.roots
    }
}

impl<'a, T> IntoIterator for &'a CommentForest<T> {
    type Item = &'a CommentNode<T>;
    type IntoIter = std::slice::Iter<'a, CommentNode<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.roots.iter()
    }
}

impl<T: Serialize> Serialize for CommentForest<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.roots.serialize(serializer)
    }
}

impl<T> Drop for CommentForest<T> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.roots);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.replies);
        }
    }
}
