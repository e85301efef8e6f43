//! # Operations
//!
//! The nine primitive edits. Every change to a document, including the ones
//! normalization makes, is one of these. Each operation carries enough data
//! to be inverted without looking at the document it was applied to.

use crate::node::{Node, Properties};
use crate::path::Path;
use crate::point::Point;
use crate::range::Range;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    InsertNode {
        path: Path,
        node: Node,
    },
    RemoveNode {
        path: Path,
        node: Node,
    },
    /// Only changed keys are stored. A `null` new value, or a key present in
    /// `properties` but absent from `new_properties`, deletes the key.
    SetNode {
        path: Path,
        properties: Properties,
        #[serde(rename = "newProperties")]
        new_properties: Properties,
    },
    /// Merges the node at `path` into its previous sibling. `position` is the
    /// length (chars or children) of that sibling before the merge.
    MergeNode {
        path: Path,
        position: usize,
        properties: Properties,
    },
    /// Splits the node at `path` at `position`; the new sibling gets
    /// `properties`.
    SplitNode {
        path: Path,
        position: usize,
        properties: Properties,
    },
    /// `new_path` is where the node is headed, addressed before the source is
    /// removed. Between siblings it is the node's final index.
    MoveNode {
        path: Path,
        #[serde(rename = "newPath")]
        new_path: Path,
    },
    InsertText {
        path: Path,
        offset: usize,
        text: String,
    },
    RemoveText {
        path: Path,
        offset: usize,
        text: String,
    },
    /// `new_properties: None` clears the selection
    SetSelection {
        properties: Option<SelectionDiff>,
        #[serde(rename = "newProperties")]
        new_properties: Option<SelectionDiff>,
    },
}

/// Partial range carried by `set_selection`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionDiff {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<Point>,
}

impl SelectionDiff {
    pub fn is_empty(&self) -> bool {
        self.anchor.is_none() && self.focus.is_none()
    }
}

impl From<Range> for SelectionDiff {
    fn from(range: Range) -> Self {
        Self {
            anchor: Some(range.anchor),
            focus: Some(range.focus),
        }
    }
}

impl Operation {
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::InsertNode { .. } => "insert_node",
            Operation::RemoveNode { .. } => "remove_node",
            Operation::SetNode { .. } => "set_node",
            Operation::MergeNode { .. } => "merge_node",
            Operation::SplitNode { .. } => "split_node",
            Operation::MoveNode { .. } => "move_node",
            Operation::InsertText { .. } => "insert_text",
            Operation::RemoveText { .. } => "remove_text",
            Operation::SetSelection { .. } => "set_selection",
        }
    }

    /// The path the operation targets; `set_selection` has none
    pub fn path(&self) -> Option<&Path> {
        match self {
            Operation::InsertNode { path, .. }
            | Operation::RemoveNode { path, .. }
            | Operation::SetNode { path, .. }
            | Operation::MergeNode { path, .. }
            | Operation::SplitNode { path, .. }
            | Operation::MoveNode { path, .. }
            | Operation::InsertText { path, .. }
            | Operation::RemoveText { path, .. } => Some(path),
            Operation::SetSelection { .. } => None,
        }
    }

    pub fn is_node_operation(&self) -> bool {
        matches!(
            self,
            Operation::InsertNode { .. }
                | Operation::RemoveNode { .. }
                | Operation::SetNode { .. }
                | Operation::MergeNode { .. }
                | Operation::SplitNode { .. }
                | Operation::MoveNode { .. }
        )
    }

    pub fn is_text_operation(&self) -> bool {
        matches!(
            self,
            Operation::InsertText { .. } | Operation::RemoveText { .. }
        )
    }

    pub fn is_selection_operation(&self) -> bool {
        matches!(self, Operation::SetSelection { .. })
    }

    /// The operation that undoes this one.
    ///
    /// Inverting an operation that could never apply (a merge of a first
    /// child, a move of the root) yields one that will not apply either.
    pub fn inverse(&self) -> Operation {
        match self {
            Operation::InsertNode { path, node } => Operation::RemoveNode {
                path: path.clone(),
                node: node.clone(),
            },
            Operation::RemoveNode { path, node } => Operation::InsertNode {
                path: path.clone(),
                node: node.clone(),
            },
            Operation::SetNode {
                path,
                properties,
                new_properties,
            } => Operation::SetNode {
                path: path.clone(),
                properties: new_properties.clone(),
                new_properties: properties.clone(),
            },
            Operation::MergeNode {
                path,
                position,
                properties,
            } => Operation::SplitNode {
                path: path.previous().unwrap_or_else(|_| path.clone()),
                position: *position,
                properties: properties.clone(),
            },
            Operation::SplitNode {
                path,
                position,
                properties,
            } => Operation::MergeNode {
                path: path.next().unwrap_or_else(|_| path.clone()),
                position: *position,
                properties: properties.clone(),
            },
            Operation::MoveNode { path, new_path } => {
                if path == new_path {
                    return self.clone();
                }
                if path.is_sibling_of(new_path) {
                    return Operation::MoveNode {
                        path: new_path.clone(),
                        new_path: path.clone(),
                    };
                }
                // The node now sits where its own path transforms to, and it
                // goes back to wherever its old next sibling ended up.
                let inverse_path = path.transform(self, None).unwrap_or_else(|| path.clone());
                let inverse_new_path = path
                    .next()
                    .ok()
                    .and_then(|next| next.transform(self, None))
                    .unwrap_or_else(|| path.clone());
                Operation::MoveNode {
                    path: inverse_path,
                    new_path: inverse_new_path,
                }
            }
            Operation::InsertText { path, offset, text } => Operation::RemoveText {
                path: path.clone(),
                offset: *offset,
                text: text.clone(),
            },
            Operation::RemoveText { path, offset, text } => Operation::InsertText {
                path: path.clone(),
                offset: *offset,
                text: text.clone(),
            },
            Operation::SetSelection {
                properties,
                new_properties,
            } => Operation::SetSelection {
                properties: new_properties.clone(),
                new_properties: properties.clone(),
            },
        }
    }
}
