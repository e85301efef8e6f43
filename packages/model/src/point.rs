//! # Points
//!
//! A [`Point`] is a path to a text leaf plus a character offset into that
//! leaf. Offsets count `char`s, so `0..=len` are always valid positions.

use crate::location::Affinity;
use crate::operation::Operation;
use crate::path::Path;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub path: Path,
    pub offset: usize,
}

impl Point {
    pub fn new(path: impl Into<Path>, offset: usize) -> Self {
        Self {
            path: path.into(),
            offset,
        }
    }

    pub fn compare(&self, other: &Point) -> Ordering {
        match self.path.compare(&other.path) {
            Ordering::Equal => self.offset.cmp(&other.offset),
            ord => ord,
        }
    }

    pub fn is_before(&self, other: &Point) -> bool {
        self.compare(other) == Ordering::Less
    }

    pub fn is_after(&self, other: &Point) -> bool {
        self.compare(other) == Ordering::Greater
    }

    /// Where this point ends up after `op`, or `None` if its leaf is gone.
    ///
    /// With forward affinity a point sitting exactly where text is inserted
    /// moves past the insertion; with backward affinity it stays before it.
    pub fn transform(&self, op: &Operation, affinity: Option<Affinity>) -> Option<Point> {
        let mut point = self.clone();

        match op {
            Operation::InsertNode { .. } | Operation::MoveNode { .. } => {
                point.path = self.path.transform(op, affinity)?;
            }

            Operation::InsertText {
                path, offset, text, ..
            } => {
                if *path == self.path
                    && (*offset < self.offset
                        || (*offset == self.offset && affinity == Some(Affinity::Forward)))
                {
                    point.offset += text.chars().count();
                }
            }

            Operation::RemoveText {
                path, offset, text, ..
            } => {
                if *path == self.path && *offset <= self.offset {
                    let removed = text.chars().count();
                    point.offset -= (self.offset - offset).min(removed);
                }
            }

            Operation::MergeNode { path, position, .. } => {
                if *path == self.path {
                    point.offset += position;
                }
                point.path = self.path.transform(op, affinity)?;
            }

            Operation::RemoveNode { path, .. } => {
                if *path == self.path || path.is_ancestor_of(&self.path) {
                    return None;
                }
                point.path = self.path.transform(op, affinity)?;
            }

            Operation::SplitNode { path, position, .. } => {
                if *path == self.path {
                    if *position == self.offset && affinity.is_none() {
                        return None;
                    }
                    if *position < self.offset
                        || (*position == self.offset && affinity == Some(Affinity::Forward))
                    {
                        point.offset -= position;
                        point.path = self.path.next().ok()?;
                    }
                } else {
                    point.path = self.path.transform(op, affinity)?;
                }
            }

            Operation::SetNode { .. } | Operation::SetSelection { .. } => {}
        }

        Some(point)
    }
}
