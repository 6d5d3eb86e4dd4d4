//! Identifier and reply indexing for comment collections

use super::model::ThreadedComment;
use crate::types::CommentId;
use std::collections::HashMap;

/// Position-based index over a flat comment collection
///
/// Built in a single pass before any linking happens, so a reply may appear
/// earlier in the input than the comment it answers.
#[derive(Debug, Clone, Default)]
pub struct ReplyIndex {
    /// First position of each identifier
    positions: HashMap<CommentId, usize>,
    /// Position of each record's parent, when present in the collection
    parents: Vec<Option<usize>>,
    /// Direct replies of each position, in input order
    children: Vec<Vec<usize>>,
    /// Top-level positions (sentinel parent or orphan), in input order
    roots: Vec<usize>,
    /// Positions whose parent identifier matches no record
    orphans: Vec<usize>,
    /// Positions repeating an identifier seen earlier
    duplicates: Vec<usize>,
}

/// Where every record of a collection ends up in the forest
#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// Final top-level positions: natural roots, then cycle breaks
    pub top: Vec<usize>,
    /// All positions in depth-first pre-order
    pub preorder: Vec<usize>,
    /// Whether a position hangs under its parent
    pub attached: Vec<bool>,
    /// Positions promoted to top level to cut a parent cycle
    pub cycle_broken: Vec<usize>,
}

impl ReplyIndex {
    /// Index a collection of comments
    pub fn build<T: ThreadedComment>(records: &[T]) -> Self {
        let mut index = Self {
            positions: HashMap::with_capacity(records.len()),
            parents: vec![None; records.len()],
            children: vec![Vec::new(); records.len()],
            ..Self::default()
        };

        for (pos, record) in records.iter().enumerate() {
            let id = record.comment_id();
            if index.positions.contains_key(id) {
                index.duplicates.push(pos);
            } else {
                index.positions.insert(id.clone(), pos);
            }
        }

        for (pos, record) in records.iter().enumerate() {
            match record.parent_id() {
                None => index.roots.push(pos),
                Some(parent) => match index.positions.get(parent) {
                    Some(&parent_pos) => {
                        index.parents[pos] = Some(parent_pos);
                        index.children[parent_pos].push(pos);
                    }
                    None => {
                        index.roots.push(pos);
                        index.orphans.push(pos);
                    }
                },
            }
        }

        index
    }

    /// Number of indexed records
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Position of the first record with this identifier
    pub fn position(&self, id: &CommentId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Position of a record's parent
    pub fn parent(&self, pos: usize) -> Option<usize> {
        self.parents.get(pos).copied().flatten()
    }

    /// Direct replies of a record
    pub fn children(&self, pos: usize) -> &[usize] {
        self.children.get(pos).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Top-level positions before cycle breaking
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Orphan positions
    pub fn orphans(&self) -> &[usize] {
        &self.orphans
    }

    /// Positions repeating an earlier identifier
    pub fn duplicates(&self) -> &[usize] {
        &self.duplicates
    }

    /// Decide the final placement of every record
    ///
    /// Records reachable from a root keep their parent. Whatever is left over
    /// hangs off a parent cycle; for each such cycle the member earliest in
    /// the input is promoted to top level and the edge back into it is cut.
    /// Every position is placed exactly once and nothing recurses.
    pub fn layout(&self) -> Layout {
        let n = self.len();
        let mut layout = Layout {
            top: Vec::with_capacity(self.roots.len()),
            preorder: Vec::with_capacity(n),
            attached: vec![false; n],
            cycle_broken: Vec::new(),
        };
        let mut placed = vec![false; n];

        for &root in &self.roots {
            layout.top.push(root);
            self.place_subtree(root, &mut placed, &mut layout);
        }

        let mut walked = vec![false; n];
        for start in 0..n {
            if placed[start] {
                continue;
            }
            let entry = self.find_cycle_entry(start, &placed, &mut walked);
            let promoted = self.earliest_in_cycle(entry);
            layout.top.push(promoted);
            layout.cycle_broken.push(promoted);
            self.place_subtree(promoted, &mut placed, &mut layout);
        }

        layout
    }

    fn place_subtree(&self, root: usize, placed: &mut [bool], layout: &mut Layout) {
        placed[root] = true;
        let mut stack = vec![root];

        while let Some(pos) = stack.pop() {
            layout.preorder.push(pos);
            for &child in self.children[pos].iter().rev() {
                if !placed[child] {
                    placed[child] = true;
                    layout.attached[child] = true;
                    stack.push(child);
                }
            }
        }
    }

    /// Follow parent links from an unplaced record until one repeats.
    ///
    /// Unplaced records always have a parent in the collection, so the walk
    /// ends on a cycle member.
    fn find_cycle_entry(&self, start: usize, placed: &[bool], walked: &mut [bool]) -> usize {
        let mut seen = Vec::new();
        let mut pos = start;

        loop {
            if walked[pos] {
                for &p in &seen {
                    walked[p] = false;
                }
                return pos;
            }
            walked[pos] = true;
            seen.push(pos);

            match self.parents[pos] {
                Some(parent) if !placed[parent] => pos = parent,
                _ => {
                    for &p in &seen {
                        walked[p] = false;
                    }
                    return pos;
                }
            }
        }
    }

    fn earliest_in_cycle(&self, entry: usize) -> usize {
        let mut earliest = entry;
        let mut pos = entry;

        while let Some(parent) = self.parents[pos] {
            if parent == entry {
                break;
            }
            earliest = earliest.min(parent);
            pos = parent;
        }

        earliest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Item {
        id: CommentId,
        parent: Option<CommentId>,
    }

    impl ThreadedComment for Item {
        fn comment_id(&self) -> &CommentId {
            &self.id
        }

        fn parent_id(&self) -> Option<&CommentId> {
            self.parent.as_ref()
        }
    }

    fn items(pairs: &[(i64, Option<i64>)]) -> Vec<Item> {
        pairs
            .iter()
            .map(|&(id, parent)| Item {
                id: CommentId::from(id),
                parent: parent.map(CommentId::from),
            })
            .collect()
    }

    #[test]
    fn test_index_children_and_roots() {
        let records = items(&[(1, None), (2, Some(1)), (3, Some(1)), (4, Some(2))]);
        let index = ReplyIndex::build(&records);

        assert_eq!(index.len(), 4);
        assert_eq!(index.roots(), &[0]);
        assert_eq!(index.children(0), &[1, 2]);
        assert_eq!(index.children(1), &[3]);
        assert_eq!(index.parent(3), Some(1));
        assert_eq!(index.position(&CommentId::Int(3)), Some(2));
    }

    #[test]
    fn test_index_child_before_parent() {
        let records = items(&[(2, Some(1)), (1, None)]);
        let index = ReplyIndex::build(&records);

        assert_eq!(index.roots(), &[1]);
        assert_eq!(index.children(1), &[0]);
        assert!(index.orphans().is_empty());
    }

    #[test]
    fn test_index_orphans_and_duplicates() {
        let records = items(&[(1, Some(99)), (2, None), (2, Some(1))]);
        let index = ReplyIndex::build(&records);

        assert_eq!(index.orphans(), &[0]);
        assert_eq!(index.roots(), &[0, 1]);
        assert_eq!(index.duplicates(), &[2]);
        assert_eq!(index.position(&CommentId::Int(2)), Some(1));
    }

    #[test]
    fn test_layout_preorder() {
        let records = items(&[(1, None), (2, Some(1)), (3, Some(1)), (4, Some(2)), (5, None)]);
        let layout = ReplyIndex::build(&records).layout();

        assert_eq!(layout.top, vec![0, 4]);
        assert_eq!(layout.preorder, vec![0, 1, 3, 2, 4]);
        assert_eq!(layout.attached, vec![false, true, true, true, false]);
        assert!(layout.cycle_broken.is_empty());
    }

    #[test]
    fn test_layout_breaks_self_reference() {
        let records = items(&[(1, None), (2, Some(2))]);
        let layout = ReplyIndex::build(&records).layout();

        assert_eq!(layout.top, vec![0, 1]);
        assert_eq!(layout.cycle_broken, vec![1]);
        assert_eq!(layout.preorder.len(), 2);
    }

    #[test]
    fn test_layout_promotes_cycle_member_not_its_descendant() {
        // 3 replies to 1, while 1 and 2 reply to each other
        let records = items(&[(3, Some(1)), (1, Some(2)), (2, Some(1))]);
        let layout = ReplyIndex::build(&records).layout();

        assert_eq!(layout.cycle_broken, vec![1]);
        assert_eq!(layout.top, vec![1]);
        assert_eq!(layout.preorder, vec![1, 0, 2]);
        assert!(layout.attached[0]);
        assert!(layout.attached[2]);
    }

    #[test]
    fn test_layout_separate_cycles() {
        let records = items(&[(1, Some(2)), (2, Some(1)), (3, Some(4)), (4, Some(3))]);
        let layout = ReplyIndex::build(&records).layout();

        assert_eq!(layout.cycle_broken, vec![0, 2]);
        assert_eq!(layout.preorder, vec![0, 1, 2, 3]);
    }
}
