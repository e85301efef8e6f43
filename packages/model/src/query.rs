//! # Tree queries
//!
//! Derived, read-only lookups over a node tree. Everything here is computed
//! from paths on demand; nothing is cached on the nodes themselves.

use crate::error::{LocationError, LocationResult};
use crate::node::{Document, Element, NodeRef, Text};
use crate::path::Path;

/// A node together with its path from the walk root
pub type Entry<'a> = (NodeRef<'a>, Path);

/// Options for a pre-order walk
///
/// `from` and `to` bound the walk in document order: subtrees before `from`
/// are skipped and the walk stops at the first node past `to`. When `pass`
/// returns true for an ancestor its descendants are not visited (the
/// ancestor itself still is).
#[derive(Default)]
pub struct Walk<'f> {
    pub from: Option<Path>,
    pub to: Option<Path>,
    pub reverse: bool,
    pub pass: Option<&'f dyn Fn(NodeRef<'_>, &Path) -> bool>,
}

impl<'f> Walk<'f> {
    pub fn between(from: Path, to: Path) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Self::default()
        }
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }
}

impl<'a> NodeRef<'a> {
    /// Every node in the subtree, this node first, in document order
    pub fn nodes(self, walk: &Walk<'_>) -> Vec<Entry<'a>> {
        let mut out = Vec::new();
        visit(self, Path::root(), walk, &mut out);
        out
    }

    /// Like [`NodeRef::nodes`] without the walk root itself
    pub fn descendants(self, walk: &Walk<'_>) -> Vec<Entry<'a>> {
        self.nodes(walk)
            .into_iter()
            .filter(|(_, path)| !path.is_root())
            .collect()
    }

    pub fn texts(self, walk: &Walk<'_>) -> Vec<(&'a Text, Path)> {
        self.nodes(walk)
            .into_iter()
            .filter_map(|(node, path)| node.as_text().map(|text| (text, path)))
            .collect()
    }

    pub fn elements(self, walk: &Walk<'_>) -> Vec<(&'a Element, Path)> {
        self.nodes(walk)
            .into_iter()
            .filter_map(|(node, path)| node.as_element().map(|element| (element, path)))
            .collect()
    }

    /// The deepest first descendant of the node at `path`
    pub fn first(self, path: &Path) -> LocationResult<Entry<'a>> {
        self.edge_descendant(path, false)
    }

    /// The deepest last descendant of the node at `path`
    pub fn last(self, path: &Path) -> LocationResult<Entry<'a>> {
        self.edge_descendant(path, true)
    }

    fn edge_descendant(self, path: &Path, last: bool) -> LocationResult<Entry<'a>> {
        let mut node = self.get(path)?;
        let mut at = path.clone();
        while let Some(children) = node.children() {
            if children.is_empty() {
                break;
            }
            let index = if last { children.len() - 1 } else { 0 };
            node = children[index].view();
            at = at.child(index);
        }
        Ok((node, at))
    }

    /// The ancestor directly above `path`
    pub fn parent(self, path: &Path) -> LocationResult<Entry<'a>> {
        let parent_path = path.parent()?;
        let parent = self.get(&parent_path)?;
        if parent.is_text() {
            return Err(LocationError::not_ancestor(&parent_path));
        }
        Ok((parent, parent_path))
    }

    /// Every node from the root down to and including `path`
    pub fn levels(self, path: &Path) -> LocationResult<Vec<Entry<'a>>> {
        path.levels()
            .into_iter()
            .map(|level| self.get(&level).map(|node| (node, level)))
            .collect()
    }

    /// Strict ancestors of `path`, root first
    pub fn ancestors(self, path: &Path) -> LocationResult<Vec<Entry<'a>>> {
        let mut levels = self.levels(path)?;
        levels.pop();
        Ok(levels)
    }

    /// Deepest node that contains both paths
    pub fn common(self, path: &Path, other: &Path) -> LocationResult<Entry<'a>> {
        let common = path.common(other);
        Ok((self.get(&common)?, common))
    }
}

fn visit<'a>(node: NodeRef<'a>, path: Path, walk: &Walk<'_>, out: &mut Vec<Entry<'a>>) -> bool {
    if let Some(to) = &walk.to {
        let past = if walk.reverse {
            path.is_before(to)
        } else {
            path.is_after(to)
        };
        if past {
            return false;
        }
    }

    out.push((node, path.clone()));

    let Some(children) = node.children() else {
        return true;
    };
    if children.is_empty() {
        return true;
    }
    if let Some(pass) = walk.pass {
        if pass(node, &path) {
            return true;
        }
    }

    let from_index = walk
        .from
        .as_ref()
        .filter(|from| path.is_ancestor_of(from))
        .map(|from| from[path.len()]);

    if walk.reverse {
        let start = from_index.map_or(children.len() - 1, |index| index.min(children.len() - 1));
        for index in (0..=start).rev() {
            if !visit(children[index].view(), path.child(index), walk, out) {
                return false;
            }
        }
    } else {
        for index in from_index.unwrap_or(0)..children.len() {
            if !visit(children[index].view(), path.child(index), walk, out) {
                return false;
            }
        }
    }
    true
}

impl Document {
    pub fn nodes(&self, walk: &Walk<'_>) -> Vec<Entry<'_>> {
        self.root().nodes(walk)
    }

    pub fn texts(&self) -> Vec<(&Text, Path)> {
        self.root().texts(&Walk::default())
    }

    pub fn parent(&self, path: &Path) -> LocationResult<Entry<'_>> {
        self.root().parent(path)
    }

    pub fn first(&self, path: &Path) -> LocationResult<Entry<'_>> {
        self.root().first(path)
    }

    pub fn last(&self, path: &Path) -> LocationResult<Entry<'_>> {
        self.root().last(path)
    }

    /// Text content of the node at `path`
    pub fn string(&self, path: &Path) -> LocationResult<String> {
        Ok(self.node(path)?.string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Element, Text};

    fn doc() -> Document {
        Document::new(vec![
            Element::of_type("p")
                .with_child(Text::new("a"))
                .with_child(Text::new("b"))
                .into(),
            Element::of_type("quote")
                .with_child(Element::of_type("p").with_child(Text::new("c")))
                .into(),
            Element::of_type("p").with_child(Text::new("d")).into(),
        ])
    }

    fn paths(entries: Vec<Entry<'_>>) -> Vec<Path> {
        entries.into_iter().map(|(_, path)| path).collect()
    }

    #[test]
    fn test_walk_is_pre_order() {
        let doc = doc();
        let all = paths(doc.nodes(&Walk::default()));
        let expected: Vec<Path> = vec![
            Path::root(),
            [0].into(),
            [0, 0].into(),
            [0, 1].into(),
            [1].into(),
            [1, 0].into(),
            [1, 0, 0].into(),
            [2].into(),
            [2, 0].into(),
        ];
        assert_eq!(all, expected);
    }

    #[test]
    fn test_walk_bounds() {
        let doc = doc();
        let bounded = paths(doc.nodes(&Walk::between([0, 1].into(), [1, 0, 0].into())));
        let expected: Vec<Path> = vec![
            Path::root(),
            [0].into(),
            [0, 1].into(),
            [1].into(),
            [1, 0].into(),
            [1, 0, 0].into(),
        ];
        assert_eq!(bounded, expected);
    }

    #[test]
    fn test_walk_reverse_with_bounds() {
        let doc = doc();
        let walk = Walk::between([1, 0, 0].into(), [0, 1].into()).reversed();
        let expected: Vec<Path> = vec![
            Path::root(),
            [1].into(),
            [1, 0].into(),
            [1, 0, 0].into(),
            [0].into(),
            [0, 1].into(),
        ];
        assert_eq!(paths(doc.nodes(&walk)), expected);
    }

    #[test]
    fn test_pass_skips_descendants() {
        let doc = doc();
        let skip_quotes = |node: NodeRef<'_>, _: &Path| {
            node.as_element().and_then(|e| e.kind()) == Some("quote")
        };
        let walk = Walk {
            pass: Some(&skip_quotes),
            ..Walk::default()
        };
        let visited = paths(doc.nodes(&walk));
        assert!(visited.contains(&[1].into()));
        assert!(!visited.contains(&[1, 0].into()));
    }

    #[test]
    fn test_first_last_levels() {
        let doc = doc();
        assert_eq!(doc.first(&Path::root()).unwrap().1, Path::from([0, 0]));
        assert_eq!(doc.last(&Path::root()).unwrap().1, Path::from([2, 0]));
        assert_eq!(doc.last(&[1].into()).unwrap().1, Path::from([1, 0, 0]));
        let levels = paths(doc.root().levels(&[1, 0, 0].into()).unwrap());
        assert_eq!(levels.len(), 4);
        assert_eq!(doc.parent(&[1, 0].into()).unwrap().1, Path::from([1]));
        assert_eq!(doc.string(&Path::root()).unwrap(), "abcd");
        assert_eq!(doc.texts().len(), 4);
    }
}
