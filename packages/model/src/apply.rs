//! # Applying operations
//!
//! [`Document::apply`] mutates the tree in place and carries the stored
//! selection along. Every branch validates before it touches the tree, so a
//! failed operation leaves the document exactly as it was.

use crate::error::{LocationError, OperationError, OperationResult};
use crate::location::Affinity;
use crate::node::{byte_offset, Document, Element, Node, Text, RESERVED_KEYS};
use crate::operation::{Operation, SelectionDiff};
use crate::path::Path;
use crate::point::Point;
use crate::range::Range;
use tracing::trace;

impl Document {
    pub fn apply(&mut self, op: &Operation) -> OperationResult<()> {
        trace!(kind = op.kind(), path = ?op.path(), "applying operation");

        match op {
            Operation::InsertNode { path, node } => {
                self.insert_child(path, node.clone(), "insert_node")
                    .map_err(|(err, _)| err)?;
            }

            Operation::RemoveNode { path, .. } => {
                let (parent, index) = split(path, "remove_node")?;
                let children = self.children_mut(&parent)?;
                if index >= children.len() {
                    return Err(LocationError::not_found(path).into());
                }
                children.remove(index);
            }

            Operation::SetNode {
                path,
                properties,
                new_properties,
            } => {
                if path.is_root() {
                    return Err(OperationError::RootPath { kind: "set_node" });
                }
                if let Some(key) = properties
                    .keys()
                    .chain(new_properties.keys())
                    .find(|key| RESERVED_KEYS.contains(&key.as_str()))
                {
                    return Err(OperationError::ReservedProperty { key: key.clone() });
                }
                let own = self.node_mut(path)?.properties_mut();
                for (key, value) in new_properties {
                    if value.is_null() {
                        own.remove(key);
                    } else {
                        own.insert(key.clone(), value.clone());
                    }
                }
                for key in properties.keys() {
                    if !new_properties.contains_key(key) {
                        own.remove(key);
                    }
                }
            }

            Operation::MergeNode { path, .. } => {
                let (parent, index) = split(path, "merge_node")?;
                let children = self.children_mut(&parent)?;
                if index >= children.len() {
                    return Err(LocationError::not_found(path).into());
                }
                if index == 0 {
                    return Err(LocationError::NoPrevious { path: path.clone() }.into());
                }
                if children[index].is_text() != children[index - 1].is_text() {
                    return Err(OperationError::MergeMismatch { path: path.clone() });
                }
                let node = children.remove(index);
                match (&mut children[index - 1], node) {
                    (Node::Text(prev), Node::Text(text)) => prev.text.push_str(&text.text),
                    (Node::Element(prev), Node::Element(element)) => {
                        prev.children.extend(element.children)
                    }
                    // kinds checked above
                    _ => {}
                }
            }

            Operation::SplitNode {
                path,
                position,
                properties,
            } => {
                let (parent, index) = split(path, "split_node")?;
                let children = self.children_mut(&parent)?;
                let node = children
                    .get_mut(index)
                    .ok_or_else(|| LocationError::not_found(path))?;
                let split_off = match node {
                    Node::Text(text) => {
                        let length = text.len();
                        if *position > length {
                            return Err(LocationError::OffsetOutOfBounds {
                                path: path.clone(),
                                offset: *position,
                                length,
                            }
                            .into());
                        }
                        let at = byte_offset(&text.text, *position);
                        Node::Text(Text {
                            text: text.text.split_off(at),
                            properties: properties.clone(),
                        })
                    }
                    Node::Element(element) => {
                        if *position > element.children.len() {
                            return Err(OperationError::IndexOutOfBounds {
                                path: path.child(*position),
                            });
                        }
                        Node::Element(Element {
                            children: element.children.split_off(*position),
                            properties: properties.clone(),
                        })
                    }
                };
                children.insert(index + 1, split_off);
            }

            Operation::MoveNode { path, new_path } => {
                let (parent, index) = split(path, "move_node")?;
                if new_path.is_root() {
                    return Err(OperationError::RootPath { kind: "move_node" });
                }
                if path.is_ancestor_of(new_path) {
                    return Err(OperationError::MoveIntoSelf {
                        path: path.clone(),
                        new_path: new_path.clone(),
                    });
                }
                let children = self.children_mut(&parent)?;
                if index >= children.len() {
                    return Err(LocationError::not_found(path).into());
                }
                if path != new_path {
                    let node = children.remove(index);
                    let true_path = path.transform(op, None).unwrap_or_else(|| new_path.clone());
                    if let Err((err, node)) = self.insert_child(&true_path, node, "move_node") {
                        // put the node back where it came from
                        if let Ok(children) = self.children_mut(&parent) {
                            children.insert(index, node);
                        }
                        return Err(err);
                    }
                }
            }

            Operation::InsertText { path, offset, text } => {
                let leaf = self.leaf_mut(path)?;
                check_offset(path, leaf, *offset)?;
                if !text.is_empty() {
                    let at = byte_offset(&leaf.text, *offset);
                    leaf.text.insert_str(at, text);
                }
            }

            Operation::RemoveText { path, offset, text } => {
                let leaf = self.leaf_mut(path)?;
                let end = offset + text.chars().count();
                check_offset(path, leaf, end)?;
                if !text.is_empty() {
                    let from = byte_offset(&leaf.text, *offset);
                    let to = byte_offset(&leaf.text, end);
                    leaf.text.replace_range(from..to, "");
                }
            }

            Operation::SetSelection { new_properties, .. } => {
                self.set_selection(new_properties.as_ref())?;
                return Ok(());
            }
        }

        self.transform_selection(op);
        Ok(())
    }

    /// Applies `op` to a copy, leaving this document untouched
    pub fn apply_to(&self, op: &Operation) -> OperationResult<Document> {
        let mut next = self.clone();
        next.apply(op)?;
        Ok(next)
    }

    /// Inserts `node` at `path`, handing the node back on failure
    fn insert_child(
        &mut self,
        path: &Path,
        node: Node,
        kind: &'static str,
    ) -> Result<(), (OperationError, Node)> {
        let (parent, index) = match split(path, kind) {
            Ok(split) => split,
            Err(err) => return Err((err, node)),
        };
        let children = match self.children_mut(&parent) {
            Ok(children) => children,
            Err(err) => return Err((err.into(), node)),
        };
        if index > children.len() {
            return Err((OperationError::IndexOutOfBounds { path: path.clone() }, node));
        }
        children.insert(index, node);
        Ok(())
    }

    fn set_selection(&mut self, diff: Option<&SelectionDiff>) -> OperationResult<()> {
        let Some(diff) = diff else {
            self.selection = None;
            return Ok(());
        };
        for point in diff.anchor.iter().chain(diff.focus.iter()) {
            self.check_point(point)?;
        }
        match &mut self.selection {
            Some(selection) => {
                if let Some(anchor) = &diff.anchor {
                    selection.anchor = anchor.clone();
                }
                if let Some(focus) = &diff.focus {
                    selection.focus = focus.clone();
                }
            }
            None => {
                let (Some(anchor), Some(focus)) = (&diff.anchor, &diff.focus) else {
                    return Err(OperationError::InvalidSelection(
                        "a new selection needs both an anchor and a focus".to_string(),
                    ));
                };
                self.selection = Some(Range::new(anchor.clone(), focus.clone()));
            }
        }
        Ok(())
    }

    /// Fails unless `point` addresses a text leaf and a valid offset in it
    pub fn check_point(&self, point: &Point) -> OperationResult<()> {
        let leaf = self.leaf(&point.path)?;
        check_offset(&point.path, leaf, point.offset)
    }

    fn transform_selection(&mut self, op: &Operation) {
        let Some(selection) = self.selection.take() else {
            return;
        };

        let mut points = [selection.anchor, selection.focus];
        for point in points.iter_mut() {
            match point.transform(op, Some(Affinity::Forward)) {
                Some(next) => *point = next,
                None => match self.nearest_surviving_point(op) {
                    Some(next) => *point = next,
                    None => return,
                },
            }
        }

        let [anchor, focus] = points;
        self.selection = Some(Range::new(anchor, focus));
    }

    /// Where a selection point lands when `remove_node` deletes its leaf: the
    /// end of the previous text, or the start of the next one when it shares
    /// a deeper ancestor with the removed node.
    fn nearest_surviving_point(&self, op: &Operation) -> Option<Point> {
        let Operation::RemoveNode { path, .. } = op else {
            return None;
        };

        let mut prev: Option<(&Text, Path)> = None;
        let mut next: Option<(&Text, Path)> = None;
        for (text, text_path) in self.texts() {
            if text_path.is_before(path) {
                prev = Some((text, text_path));
            } else {
                next = Some((text, text_path));
                break;
            }
        }

        let prefer_next = match (&prev, &next) {
            (Some((_, prev_path)), Some((_, next_path))) => {
                if next_path == path {
                    !next_path.has_previous()
                } else {
                    prev_path.common(path).len() < next_path.common(path).len()
                }
            }
            _ => false,
        };

        match (prev, next) {
            (Some((text, prev_path)), _) if !prefer_next => Some(Point::new(prev_path, text.len())),
            (_, Some((_, next_path))) => Some(Point::new(next_path, 0)),
            _ => None,
        }
    }
}

fn split(path: &Path, kind: &'static str) -> OperationResult<(Path, usize)> {
    match path.split_last() {
        Some((&index, parent)) => Ok((Path::from(parent), index)),
        None => Err(OperationError::RootPath { kind }),
    }
}

fn check_offset(path: &Path, leaf: &Text, offset: usize) -> OperationResult<()> {
    let length = leaf.len();
    if offset > length {
        return Err(LocationError::OffsetOutOfBounds {
            path: path.clone(),
            offset,
            length,
        }
        .into());
    }
    Ok(())
}
