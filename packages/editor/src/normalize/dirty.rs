//! Dirty path bookkeeping
//!
//! Every applied operation marks the paths whose subtrees it may have broken.
//! Paths already marked are carried through the operation so they keep
//! pointing at the same nodes.

use quire_model::{Affinity, Node, Operation, Path, Walk};
use std::collections::HashSet;

#[derive(Debug, Default)]
pub(crate) struct DirtyPaths {
    paths: Vec<Path>,
    keys: HashSet<Path>,
}

impl DirtyPaths {
    pub(crate) fn len(&self) -> usize {
        self.paths.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub(crate) fn add(&mut self, path: Path) {
        if self.keys.insert(path.clone()) {
            self.paths.push(path);
        }
    }

    /// Most recently marked first, so children are visited before parents
    pub(crate) fn pop(&mut self) -> Option<Path> {
        let path = self.paths.pop()?;
        self.keys.remove(&path);
        Some(path)
    }

    pub(crate) fn snapshot(&self) -> Vec<Path> {
        self.paths.clone()
    }

    pub(crate) fn replace(&mut self, paths: impl IntoIterator<Item = Path>) {
        self.paths.clear();
        self.keys.clear();
        for path in paths {
            self.add(path);
        }
    }

    /// Transforms the marked paths through `op`, then marks what `op` touched
    pub(crate) fn update(&mut self, op: &Operation) {
        if can_transform_paths(op) {
            let previous = std::mem::take(&mut self.paths);
            self.keys.clear();
            for path in previous {
                if let Some(next) = path.transform(op, Some(Affinity::Forward)) {
                    self.add(next);
                }
            }
        }
        for path in touched_paths(op) {
            self.add(path);
        }
    }
}

fn can_transform_paths(op: &Operation) -> bool {
    matches!(
        op,
        Operation::InsertNode { .. }
            | Operation::RemoveNode { .. }
            | Operation::MergeNode { .. }
            | Operation::SplitNode { .. }
            | Operation::MoveNode { .. }
    )
}

/// Paths whose nodes may violate an invariant after `op`
pub(crate) fn touched_paths(op: &Operation) -> Vec<Path> {
    match op {
        Operation::InsertText { path, .. }
        | Operation::RemoveText { path, .. }
        | Operation::SetNode { path, .. } => path.levels(),

        Operation::InsertNode { path, node } => {
            let mut paths = path.levels();
            if let Node::Element(_) = node {
                paths.extend(
                    node.view()
                        .descendants(&Walk::default())
                        .into_iter()
                        .map(|(_, relative)| path.concat(&relative)),
                );
            }
            paths
        }

        Operation::MergeNode { path, .. } => {
            let mut paths = path.ancestors();
            if let Ok(previous) = path.previous() {
                paths.push(previous);
            }
            paths
        }

        Operation::MoveNode { path, new_path } => {
            if path == new_path {
                return Vec::new();
            }
            let transform = |ancestor: Path| ancestor.transform(op, None).unwrap_or(ancestor);
            let old_ancestors: Vec<Path> = path.ancestors().into_iter().map(transform).collect();
            let new_ancestors: Vec<Path> =
                new_path.ancestors().into_iter().map(transform).collect();
            let mut paths = old_ancestors;
            if let (Some(new_parent), Some(&index)) = (new_ancestors.last(), new_path.last()) {
                let result = new_parent.child(index);
                paths.extend(new_ancestors.iter().cloned());
                paths.push(result);
            }
            paths
        }

        Operation::RemoveNode { path, .. } => path.ancestors(),

        Operation::SplitNode { path, .. } => {
            let mut paths = path.levels();
            if let Ok(next) = path.next() {
                paths.push(next);
            }
            paths
        }

        Operation::SetSelection { .. } => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_model::{Element, Properties, Text};

    #[test]
    fn test_insert_node_marks_levels_and_descendants() {
        let op = Operation::InsertNode {
            path: [1].into(),
            node: Element::of_type("p").with_child(Text::new("x")).into(),
        };
        let paths = touched_paths(&op);
        assert_eq!(paths, vec![Path::root(), [1].into(), [1, 0].into()]);
    }

    #[test]
    fn test_marked_paths_follow_later_operations() {
        let mut dirty = DirtyPaths::default();
        dirty.add([2, 0].into());
        dirty.update(&Operation::RemoveNode {
            path: [0].into(),
            node: Text::new("").into(),
        });
        assert_eq!(dirty.snapshot(), vec![[1, 0].into(), Path::root()]);
    }

    #[test]
    fn test_duplicates_are_ignored_and_pop_is_lifo() {
        let mut dirty = DirtyPaths::default();
        dirty.update(&Operation::SplitNode {
            path: [0, 1].into(),
            position: 1,
            properties: Properties::new(),
        });
        dirty.update(&Operation::InsertText {
            path: [0, 1].into(),
            offset: 0,
            text: "a".into(),
        });
        assert_eq!(dirty.len(), 4);
        assert_eq!(dirty.pop(), Some([0, 2].into()));
        assert_eq!(dirty.pop(), Some([0, 1].into()));
    }
}
