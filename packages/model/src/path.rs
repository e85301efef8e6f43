//! # Paths
//!
//! A [`Path`] is the list of child indexes walked from the root to reach a
//! node. `[]` is the root itself, `[0]` its first child, `[0, 2]` the third
//! child of that node, and so on.
//!
//! Comparison is lexicographic over the shared prefix: an ancestor compares
//! *equal* to all of its descendants. That makes "is this path before that
//! one" answer the question editors usually mean (document order of
//! subtrees), and it is why `Path` does not implement `Ord`.

use crate::error::{LocationError, LocationResult};
use crate::location::Affinity;
use crate::operation::Operation;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

/// Index sequence locating a node from the root
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<usize>);

impl Path {
    pub fn new(indexes: Vec<usize>) -> Self {
        Self(indexes)
    }

    /// The empty path, addressing the root
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }

    /// Path of the child at `index` below this path
    pub fn child(&self, index: usize) -> Path {
        let mut indexes = self.0.clone();
        indexes.push(index);
        Path(indexes)
    }

    /// This path followed by `tail`
    pub fn concat(&self, tail: &[usize]) -> Path {
        let mut indexes = self.0.clone();
        indexes.extend_from_slice(tail);
        Path(indexes)
    }

    /// The first `depth` indexes of this path
    pub fn truncate(&self, depth: usize) -> Path {
        Path(self.0[..depth.min(self.0.len())].to_vec())
    }

    pub fn parent(&self) -> LocationResult<Path> {
        if self.is_root() {
            return Err(LocationError::Root { relation: "parent" });
        }
        Ok(Path(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Path of the next sibling (which may not exist in the tree)
    pub fn next(&self) -> LocationResult<Path> {
        let Some(last) = self.0.last() else {
            return Err(LocationError::Root { relation: "next sibling" });
        };
        let mut indexes = self.0.clone();
        let depth = indexes.len() - 1;
        indexes[depth] = last + 1;
        Ok(Path(indexes))
    }

    pub fn previous(&self) -> LocationResult<Path> {
        match self.0.last() {
            None => Err(LocationError::Root {
                relation: "previous sibling",
            }),
            Some(0) => Err(LocationError::NoPrevious { path: self.clone() }),
            Some(last) => {
                let mut indexes = self.0.clone();
                let depth = indexes.len() - 1;
                indexes[depth] = last - 1;
                Ok(Path(indexes))
            }
        }
    }

    pub fn has_previous(&self) -> bool {
        matches!(self.0.last(), Some(last) if *last > 0)
    }

    /// Document-order comparison; ancestors compare equal to descendants
    pub fn compare(&self, other: &Path) -> Ordering {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a.cmp(b))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    pub fn is_before(&self, other: &Path) -> bool {
        self.compare(other) == Ordering::Less
    }

    pub fn is_after(&self, other: &Path) -> bool {
        self.compare(other) == Ordering::Greater
    }

    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }

    pub fn is_descendant_of(&self, other: &Path) -> bool {
        other.is_ancestor_of(self)
    }

    pub fn is_parent_of(&self, other: &Path) -> bool {
        self.0.len() + 1 == other.0.len() && other.0.starts_with(&self.0)
    }

    pub fn is_child_of(&self, other: &Path) -> bool {
        other.is_parent_of(self)
    }

    /// True when this path is equal to or an ancestor of `other`
    pub fn is_common(&self, other: &Path) -> bool {
        self.0.len() <= other.0.len() && other.0.starts_with(&self.0)
    }

    pub fn is_sibling_of(&self, other: &Path) -> bool {
        if self.0.len() != other.0.len() || self.is_root() {
            return false;
        }
        let depth = self.0.len() - 1;
        self.0[depth] != other.0[depth] && self.0[..depth] == other.0[..depth]
    }

    /// Compare the last index of this path with the index at the same depth
    /// of `other`, provided both share the same parent prefix.
    fn cmp_at_end(&self, other: &Path) -> Option<Ordering> {
        let depth = self.0.len().checked_sub(1)?;
        if other.0.len() <= depth || self.0[..depth] != other.0[..depth] {
            return None;
        }
        Some(self.0[depth].cmp(&other.0[depth]))
    }

    /// Same parent prefix, and this path's last index is before `other`'s
    /// index at that depth
    pub fn ends_before(&self, other: &Path) -> bool {
        self.cmp_at_end(other) == Some(Ordering::Less)
    }

    pub fn ends_after(&self, other: &Path) -> bool {
        self.cmp_at_end(other) == Some(Ordering::Greater)
    }

    pub fn ends_at(&self, other: &Path) -> bool {
        self.cmp_at_end(other) == Some(Ordering::Equal)
    }

    /// Longest shared prefix
    pub fn common(&self, other: &Path) -> Path {
        Path(
            self.0
                .iter()
                .zip(other.0.iter())
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| *a)
                .collect(),
        )
    }

    /// Every path from the root down to (and including) this one
    pub fn levels(&self) -> Vec<Path> {
        (0..=self.0.len()).map(|depth| self.truncate(depth)).collect()
    }

    /// Every strict ancestor, root first
    pub fn ancestors(&self) -> Vec<Path> {
        (0..self.0.len()).map(|depth| self.truncate(depth)).collect()
    }

    /// This path expressed relative to `ancestor`
    pub fn relative(&self, ancestor: &Path) -> LocationResult<Path> {
        if !ancestor.is_ancestor_of(self) && ancestor != self {
            return Err(LocationError::not_ancestor(ancestor));
        }
        Ok(Path(self.0[ancestor.len()..].to_vec()))
    }

    fn increment(&mut self, depth: usize, by: usize) {
        self.0[depth] += by;
    }

    fn decrement(&mut self, depth: usize, by: usize) {
        self.0[depth] = self.0[depth].saturating_sub(by);
    }

    /// Where this path ends up after `op` is applied, or `None` if the node
    /// it addresses no longer exists.
    ///
    /// `affinity` only matters for `split_node` of the node itself: forward
    /// follows the split-off sibling, backward stays, `None` drops the path.
    pub fn transform(&self, op: &Operation, affinity: Option<Affinity>) -> Option<Path> {
        let mut p = self.clone();

        match op {
            Operation::InsertNode { path: op_path, .. } => {
                if op_path.is_root() {
                    return Some(p);
                }
                if op_path == self || op_path.ends_before(self) || op_path.is_ancestor_of(self) {
                    p.increment(op_path.len() - 1, 1);
                }
            }

            Operation::RemoveNode { path: op_path, .. } => {
                if op_path == self || op_path.is_ancestor_of(self) {
                    return None;
                }
                if op_path.ends_before(self) {
                    p.decrement(op_path.len() - 1, 1);
                }
            }

            Operation::MergeNode {
                path: op_path,
                position,
                ..
            } => {
                if op_path.is_root() {
                    return Some(p);
                }
                let depth = op_path.len() - 1;
                if op_path == self || op_path.ends_before(self) {
                    p.decrement(depth, 1);
                } else if op_path.is_ancestor_of(self) {
                    p.decrement(depth, 1);
                    p.increment(depth + 1, *position);
                }
            }

            Operation::SplitNode {
                path: op_path,
                position,
                ..
            } => {
                if op_path.is_root() {
                    return Some(p);
                }
                let depth = op_path.len() - 1;
                if op_path == self {
                    match affinity {
                        Some(Affinity::Forward) => p.increment(depth, 1),
                        Some(Affinity::Backward) => {}
                        None => return None,
                    }
                } else if op_path.ends_before(self) {
                    p.increment(depth, 1);
                } else if op_path.is_ancestor_of(self) && self.0[depth + 1] >= *position {
                    p.increment(depth, 1);
                    p.decrement(depth + 1, *position);
                }
            }

            Operation::MoveNode {
                path: op_path,
                new_path,
            } => {
                if op_path == new_path || op_path.is_root() || new_path.is_root() {
                    return Some(p);
                }
                let op_depth = op_path.len() - 1;
                let new_depth = new_path.len() - 1;

                if op_path == self || op_path.is_ancestor_of(self) {
                    // The moved subtree: rebase onto the insertion point,
                    // which shifts back by one when the source sat before an
                    // ancestor of the destination.
                    let mut target = new_path.clone();
                    if op_path.ends_before(new_path) && op_path.len() < new_path.len() {
                        target.decrement(op_depth, 1);
                    }
                    return Some(target.concat(&self.0[op_path.len()..]));
                } else if op_path.is_sibling_of(new_path)
                    && (new_path.is_ancestor_of(self) || new_path == self)
                {
                    if op_path.ends_before(self) {
                        p.decrement(op_depth, 1);
                    } else {
                        p.increment(op_depth, 1);
                    }
                } else if new_path.ends_before(self) || new_path == self || new_path.is_ancestor_of(self)
                {
                    if op_path.ends_before(self) {
                        p.decrement(op_depth, 1);
                    }
                    p.increment(new_depth, 1);
                } else if op_path.ends_before(self) {
                    p.decrement(op_depth, 1);
                }
            }

            Operation::SetNode { .. }
            | Operation::InsertText { .. }
            | Operation::RemoveText { .. }
            | Operation::SetSelection { .. } => {}
        }

        Some(p)
    }
}

impl Deref for Path {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for Path {
    fn from(indexes: Vec<usize>) -> Self {
        Self(indexes)
    }
}

impl From<&[usize]> for Path {
    fn from(indexes: &[usize]) -> Self {
        Self(indexes.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Path {
    fn from(indexes: [usize; N]) -> Self {
        Self(indexes.to_vec())
    }
}

impl FromIterator<usize> for Path {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", index)?;
        }
        write!(f, "]")
    }
}
