//! Node transforms
//!
//! Every transform here resolves its target nodes up front, tracks them with
//! path refs while it applies operations, and releases the refs before
//! returning, whether it succeeded or not.

use crate::editor::Editor;
use crate::errors::{EditorError, EditorResult};
use crate::queries::{AboveOptions, Distance, LevelsOptions, Mode, NodesOptions};
use crate::refs::PathRef;
use crate::transforms::{DeleteOptions, NodeOptions};
use quire_model::{
    Affinity, Element, Location, Matcher, Node, NodeRef, Operation, Path, Point, Properties, Range,
    RangeAffinity, Schema, Text, RESERVED_KEYS,
};
use serde_json::Value;
use tracing::trace;

impl Editor {
    pub fn insert_node(&mut self, node: impl Into<Node>, options: NodeOptions) -> EditorResult<()> {
        self.insert_nodes(vec![node.into()], options)
    }

    /// Inserts `nodes` as consecutive siblings.
    ///
    /// A path target is the index of the first inserted node. A point target
    /// splits the nodes the first inserted node would belong to (texts for a
    /// text, inlines for an inline, blocks otherwise) and inserts between
    /// the halves. An expanded range is deleted first.
    pub fn insert_nodes(&mut self, nodes: Vec<Node>, options: NodeOptions) -> EditorResult<()> {
        if nodes.is_empty() {
            return Ok(());
        }
        let select = options.select.unwrap_or(options.at.is_none());
        let at = self.resolve_at(options.at.clone())?;
        let voids = options.voids;

        self.without_normalizing(|editor| {
            let mut at = at;
            if let Location::Range(range) = at.clone() {
                let range = if options.hanging {
                    range
                } else {
                    editor.unhang_range(range, voids)?
                };
                at = match editor.delete_to_end(range, voids)? {
                    Some(point) => Location::Point(point),
                    None => return Ok(()),
                };
            }

            let path = match at {
                Location::Point(point) => {
                    let matcher = match &options.matcher {
                        Some(matcher) => matcher.clone(),
                        None => editor.insert_matcher(&nodes[0]),
                    };
                    let found = editor
                        .node_paths(
                            &NodesOptions::at(point.path.clone())
                                .matching(matcher.clone())
                                .mode(options.mode)
                                .voids(voids),
                        )?
                        .into_iter()
                        .next();
                    let Some(match_path) = found else {
                        return Ok(());
                    };

                    let is_at_end = editor.is_end(&point, match_path.clone())?;
                    let path_ref = editor.path_ref(match_path, Some(Affinity::Forward));
                    let split = editor.split_nodes(NodeOptions {
                        matcher: Some(matcher),
                        mode: options.mode,
                        voids,
                        ..NodeOptions::at(point)
                    });
                    let path = path_ref.unref(editor);
                    split?;
                    match path {
                        Some(path) if is_at_end => path.next()?,
                        Some(path) => path,
                        None => return Ok(()),
                    }
                }
                Location::Path(path) => path,
                Location::Range(_) => return Ok(()),
            };

            let parent = path.parent()?;
            let inside_void = !editor
                .levels(&LevelsOptions {
                    at: Some(parent.clone().into()),
                    matcher: Matcher::Void,
                    ..LevelsOptions::default()
                })?
                .is_empty();
            if !voids && inside_void {
                return Ok(());
            }

            let index = path.last().copied().unwrap_or_default();
            let count = nodes.len();
            for (offset, node) in nodes.into_iter().enumerate() {
                editor.apply(Operation::InsertNode {
                    path: parent.child(index + offset),
                    node,
                })?;
            }

            if select {
                let point = editor.end(parent.child(index + count - 1))?;
                editor.select(point)?;
            }
            Ok(())
        })
    }

    /// Removes the matching nodes
    pub fn remove_nodes(&mut self, options: NodeOptions) -> EditorResult<()> {
        let at = self.resolve_at(options.at.clone())?;
        let matcher = options
            .matcher
            .clone()
            .unwrap_or_else(|| self.default_matcher(&at));
        let voids = options.voids;

        self.without_normalizing(|editor| {
            let at = match at {
                Location::Range(range) if !options.hanging => {
                    Location::Range(editor.unhang_range(range, voids)?)
                }
                at => at,
            };
            let refs = editor.track_matches(&at, matcher, options.mode, voids)?;
            editor.for_each_ref(refs, |editor, path| editor.remove_node_at(&path))
        })
    }

    /// Splits the matching ancestors of a point, from the leaf up.
    ///
    /// A node is only split when the point is inside it, unless `always` is
    /// set; `height` leaves that many levels above the leaf untouched. A path
    /// target splits its parent right before it.
    pub fn split_nodes(&mut self, options: NodeOptions) -> EditorResult<()> {
        let at = self.resolve_at(options.at.clone())?;
        let select = options.at.is_none();
        let voids = options.voids;
        let mode = options.mode;

        self.without_normalizing(|editor| {
            let mut matcher = options.matcher.clone().unwrap_or(Matcher::Block);
            let mut height = options.height;
            let mut always = options.always;

            let mut point = match at {
                Location::Range(range) => match editor.delete_to_end(range, false)? {
                    Some(point) => point,
                    None => return Ok(()),
                },
                Location::Path(path) => {
                    let point = editor.start(path.clone())?;
                    matcher = Matcher::at(path.parent()?);
                    height = point.path.len() - path.len() + 1;
                    always = true;
                    point
                }
                Location::Point(point) => point,
            };

            let before_ref = editor.point_ref(point.clone(), Some(Affinity::Backward));
            let mut after_ref = None;

            let result = (|| -> EditorResult<()> {
                let highest = editor
                    .node_paths(
                        &NodesOptions::at(point.clone())
                            .matching(matcher)
                            .mode(mode)
                            .voids(voids),
                    )?
                    .into_iter()
                    .next();
                let Some(highest_path) = highest else {
                    return Ok(());
                };

                let void_match = editor
                    .void(&AboveOptions::at(point.clone()).mode(Mode::Highest))?
                    .map(|(node, path)| {
                        let inline = node
                            .as_element()
                            .is_some_and(|element| editor.is_inline(element));
                        (inline, path)
                    });
                if let (false, Some((inline, void_path))) = (voids, void_match) {
                    // splitting next to an inline void happens after it
                    if inline {
                        point = match editor.after(void_path.clone(), Distance::default())? {
                            Some(after) => after,
                            None => {
                                let after_path = void_path.next()?;
                                editor.insert_node(
                                    Text::new(""),
                                    NodeOptions {
                                        voids,
                                        ..NodeOptions::at(after_path.clone())
                                    },
                                )?;
                                editor.start(after_path)?
                            }
                        };
                    }
                    height = point.path.len() - void_path.len() + 1;
                    always = true;
                }

                after_ref = Some(editor.point_ref(point.clone(), Some(Affinity::Forward)));
                let depth = point.path.len().checked_sub(height).ok_or_else(|| {
                    EditorError::invalid_transform(format!(
                        "split height {height} is deeper than the point at {}",
                        point.path
                    ))
                })?;
                let lowest_path = point.path.truncate(depth);
                let mut position = if height == 0 {
                    point.offset
                } else {
                    point.path[depth]
                };

                let levels: Vec<(Path, Properties, bool)> = editor
                    .levels(&LevelsOptions {
                        at: Some(lowest_path.into()),
                        reverse: true,
                        voids,
                        ..LevelsOptions::default()
                    })?
                    .into_iter()
                    .map(|(node, path)| {
                        let is_void = node
                            .as_element()
                            .is_some_and(|element| editor.is_void(element));
                        (path, node.properties().cloned().unwrap_or_default(), is_void)
                    })
                    .collect();

                for (path, properties, is_void) in levels {
                    if path.len() < highest_path.len() || path.is_root() || (!voids && is_void) {
                        break;
                    }
                    let Some(current) = before_ref.current(editor) else {
                        break;
                    };
                    let is_end = editor.is_end(&current, path.clone())?;
                    let split = always || !editor.is_edge(&current, path.clone())?;
                    if split {
                        editor.apply(Operation::SplitNode {
                            path: path.clone(),
                            position,
                            properties,
                        })?;
                    }
                    position = path.last().copied().unwrap_or_default() + usize::from(split || is_end);
                }

                if select {
                    let point = match after_ref.as_ref().and_then(|r| r.current(editor)) {
                        Some(point) => point,
                        None => editor.end(Path::root())?,
                    };
                    editor.select(point)?;
                }
                Ok(())
            })();

            before_ref.unref(editor);
            if let Some(after_ref) = after_ref {
                after_ref.unref(editor);
            }
            result
        })
    }

    /// Merges the matching node into the previous matching node.
    ///
    /// Nodes that are not adjacent siblings are moved next to each other
    /// first, and ancestors the move leaves empty are removed. An empty
    /// previous node is removed instead of merged into.
    pub fn merge_nodes(&mut self, options: NodeOptions) -> EditorResult<()> {
        let at = self.resolve_at(options.at.clone())?;
        let explicit = options.at.is_some();
        let voids = options.voids;
        let mode = options.mode;

        self.without_normalizing(|editor| {
            let matcher = match (&options.matcher, &at) {
                (Some(matcher), _) => matcher.clone(),
                (None, Location::Path(path)) => {
                    let parent = path.parent()?;
                    Matcher::predicate(move |_, candidate, _| candidate.is_child_of(&parent))
                }
                (None, _) => Matcher::Block,
            };

            let mut at = at;
            if let Location::Range(range) = at.clone() {
                let range = if options.hanging {
                    range
                } else {
                    editor.unhang_range(range, voids)?
                };
                let collapsed = range.is_collapsed();
                let Some(point) = editor.delete_to_end(range, voids)? else {
                    return Ok(());
                };
                if !collapsed && !explicit {
                    editor.select(point.clone())?;
                }
                at = Location::Point(point);
            }

            let current = editor
                .node_paths(
                    &NodesOptions::at(at.clone())
                        .matching(matcher.clone())
                        .mode(mode)
                        .voids(voids),
                )?
                .into_iter()
                .next();
            let previous = editor
                .previous(&AboveOptions {
                    at: Some(at),
                    matcher: Some(matcher),
                    mode,
                    voids,
                })?
                .map(|(_, path)| path);
            let (Some(path), Some(prev_path)) = (current, previous) else {
                return Ok(());
            };
            if path.is_root() || prev_path.is_root() {
                return Ok(());
            }

            let new_path = prev_path.next()?;
            let common = path.common(&prev_path);
            let is_previous_sibling = path.is_sibling_of(&prev_path);

            let (position, properties, remove_previous) = {
                let node = editor.document().node(&path)?;
                let prev = editor.document().node(&prev_path)?;
                match (node, prev) {
                    (NodeRef::Text(text), NodeRef::Text(prev_text)) => (
                        prev_text.len(),
                        text.properties.clone(),
                        prev_text.is_empty() && prev_path.last() != Some(&0),
                    ),
                    (NodeRef::Element(element), NodeRef::Element(prev_element)) => (
                        prev_element.children.len(),
                        element.properties.clone(),
                        editor.is_empty(prev_element),
                    ),
                    _ => {
                        return Err(EditorError::invalid_transform(format!(
                            "cannot merge {path} into {prev_path}, they are different kinds of node"
                        )))
                    }
                }
            };

            // the highest ancestor the merge would leave holding nothing
            let empty_ancestor = {
                let target = path.clone();
                let depth = common.len();
                editor
                    .above(&AboveOptions {
                        at: Some(path.clone().into()),
                        matcher: Some(Matcher::predicate(move |node, candidate, schema| {
                            candidate.len() >= depth
                                && candidate.len() < target.len()
                                && has_single_child_nest(node, schema)
                        })),
                        mode: Mode::Highest,
                        voids: false,
                    })?
                    .map(|(_, path)| path)
            };
            let empty_ref = empty_ancestor.map(|path| editor.path_ref(path, Some(Affinity::Forward)));

            let result = (|| -> EditorResult<()> {
                if !is_previous_sibling {
                    editor.move_nodes(
                        new_path.clone(),
                        NodeOptions {
                            voids,
                            ..NodeOptions::at(path.clone())
                        },
                    )?;
                }
                if let Some(empty) = empty_ref.as_ref().and_then(|r| r.current(editor)) {
                    editor.remove_nodes(NodeOptions {
                        voids,
                        ..NodeOptions::at(empty)
                    })?;
                }
                if remove_previous {
                    editor.remove_nodes(NodeOptions {
                        voids,
                        ..NodeOptions::at(prev_path.clone())
                    })
                } else {
                    editor.apply(Operation::MergeNode {
                        path: new_path.clone(),
                        position,
                        properties,
                    })
                }
            })();

            if let Some(empty_ref) = empty_ref {
                empty_ref.unref(editor);
            }
            result
        })
    }

    /// Moves the matching nodes to `to`, keeping their order
    pub fn move_nodes(&mut self, to: Path, options: NodeOptions) -> EditorResult<()> {
        let at = self.resolve_at(options.at.clone())?;
        let matcher = options
            .matcher
            .clone()
            .unwrap_or_else(|| self.default_matcher(&at));
        let voids = options.voids;

        self.without_normalizing(|editor| {
            let to_ref = editor.path_ref(to, Some(Affinity::Forward));
            let refs = match editor.track_matches(&at, matcher, options.mode, voids) {
                Ok(refs) => refs,
                Err(err) => {
                    to_ref.unref(editor);
                    return Err(err);
                }
            };

            let result = editor.for_each_ref(refs, |editor, path| {
                let Some(new_path) = to_ref.current(editor) else {
                    return Ok(());
                };
                if !path.is_root() {
                    editor.apply(Operation::MoveNode {
                        path: path.clone(),
                        new_path: new_path.clone(),
                    })?;
                }
                // a later sibling lands before the destination, so the next
                // node goes after it
                if new_path.is_sibling_of(&path) && new_path.is_after(&path) {
                    if let Some(current) = to_ref.current(editor) {
                        to_ref.set(editor, current.next()?);
                    }
                }
                Ok(())
            });

            to_ref.unref(editor);
            result
        })
    }

    /// Sets properties on the matching nodes. A `null` value removes the key.
    /// Only keys whose value actually changes are written.
    pub fn set_nodes(&mut self, props: Properties, options: NodeOptions) -> EditorResult<()> {
        let at = self.resolve_at(options.at.clone())?;
        let matcher = options
            .matcher
            .clone()
            .unwrap_or_else(|| self.default_matcher(&at));
        let voids = options.voids;
        let mode = options.mode;

        self.without_normalizing(|editor| {
            let mut at = match at {
                Location::Range(range) if !options.hanging => {
                    Location::Range(editor.unhang_range(range, voids)?)
                }
                at => at,
            };

            if let (true, Location::Range(range)) = (options.split, at.clone()) {
                if range.is_collapsed() && !editor.leaf(range.anchor.clone())?.0.is_empty() {
                    // nothing to set that normalization would not merge away
                    return Ok(());
                }
                let split_mode = if mode == Mode::Lowest {
                    Mode::Lowest
                } else {
                    Mode::Highest
                };
                let (start, end) = range.edges();
                let range_ref = editor.range_ref(range, Some(RangeAffinity::Inward));
                let result = (|| -> EditorResult<()> {
                    let end_at_end = editor.is_end(&end, end.path.clone())?;
                    editor.split_nodes(NodeOptions {
                        matcher: Some(matcher.clone()),
                        mode: split_mode,
                        voids,
                        always: !end_at_end,
                        ..NodeOptions::at(end.clone())
                    })?;
                    let start_at_start = editor.is_start(&start, start.path.clone())?;
                    editor.split_nodes(NodeOptions {
                        matcher: Some(matcher.clone()),
                        mode: split_mode,
                        voids,
                        always: !start_at_start,
                        ..NodeOptions::at(start.clone())
                    })
                })();
                let current = range_ref.unref(editor);
                result?;
                match current {
                    Some(range) => at = Location::Range(range),
                    None => return Ok(()),
                }
            }

            let targets = editor.node_paths(
                &NodesOptions::at(at)
                    .matching(matcher)
                    .mode(mode)
                    .voids(voids),
            )?;
            for path in targets {
                if path.is_root() {
                    continue;
                }
                let own = editor.document().node(&path)?.properties().cloned().unwrap_or_default();
                if let Some((properties, new_properties)) = property_changes(&own, &props) {
                    editor.apply(Operation::SetNode {
                        path,
                        properties,
                        new_properties,
                    })?;
                }
            }
            Ok(())
        })
    }

    /// Removes `keys` from the matching nodes
    pub fn unset_nodes(&mut self, keys: &[&str], options: NodeOptions) -> EditorResult<()> {
        let props = keys
            .iter()
            .map(|key| (key.to_string(), Value::Null))
            .collect();
        self.set_nodes(props, options)
    }

    /// Moves the matching nodes up one level, splitting their parent when
    /// they sit in its middle. A parent left empty is removed.
    pub fn lift_nodes(&mut self, options: NodeOptions) -> EditorResult<()> {
        let at = self.resolve_at(options.at.clone())?;
        let matcher = options
            .matcher
            .clone()
            .unwrap_or_else(|| self.default_matcher(&at));
        let voids = options.voids;

        self.without_normalizing(|editor| {
            let refs = editor.track_matches(&at, matcher, options.mode, voids)?;
            editor.for_each_ref(refs, |editor, path| editor.lift_node(&path, voids))
        })
    }

    fn lift_node(&mut self, path: &Path, voids: bool) -> EditorResult<()> {
        if path.len() < 2 {
            return Err(EditorError::invalid_transform(format!(
                "cannot lift the node at {path}, it has a depth of less than 2"
            )));
        }
        let parent_path = path.parent()?;
        let length = self
            .document
            .node(&parent_path)?
            .children()
            .map_or(0, <[Node]>::len);
        let index = path[path.len() - 1];
        let at = |path: Path| NodeOptions {
            voids,
            ..NodeOptions::at(path)
        };

        trace!(%path, index, length, "lifting node");
        if length == 1 {
            self.move_nodes(parent_path.next()?, at(path.clone()))?;
            self.remove_nodes(at(parent_path))
        } else if index == 0 {
            self.move_nodes(parent_path, at(path.clone()))
        } else if index == length - 1 {
            self.move_nodes(parent_path.next()?, at(path.clone()))
        } else {
            self.split_nodes(at(path.next()?))?;
            self.move_nodes(parent_path.next()?, at(path.clone()))
        }
    }

    /// Replaces each matching node with its children
    pub fn unwrap_nodes(&mut self, options: NodeOptions) -> EditorResult<()> {
        let at = self.resolve_at(options.at.clone())?;
        let matcher = options
            .matcher
            .clone()
            .unwrap_or_else(|| self.default_matcher(&at));
        let voids = options.voids;
        let split = options.split;

        self.without_normalizing(|editor| {
            let at = match at {
                Location::Path(path) => Location::Range(editor.range(path)?),
                at => at,
            };
            let paths = editor.node_paths(
                &NodesOptions::at(at.clone())
                    .matching(matcher)
                    .mode(options.mode)
                    .voids(voids),
            )?;
            let range_ref = at
                .as_range()
                .cloned()
                .map(|range| editor.range_ref(range, Some(RangeAffinity::Forward)));
            let refs: Vec<PathRef> = paths
                .into_iter()
                .rev()
                .map(|path| editor.path_ref(path, Some(Affinity::Forward)))
                .collect();

            let result = editor.for_each_ref(refs, |editor, path| {
                let mut range = editor.range(path.clone())?;
                if split {
                    if let Some(current) = range_ref.as_ref().and_then(|r| r.current(editor)) {
                        match current.intersection(&range) {
                            Some(intersection) => range = intersection,
                            None => return Ok(()),
                        }
                    }
                }
                editor.lift_nodes(NodeOptions {
                    matcher: Some(Matcher::predicate(move |_, candidate, _| {
                        candidate.is_child_of(&path)
                    })),
                    voids,
                    ..NodeOptions::at(range)
                })
            });

            if let Some(range_ref) = range_ref {
                range_ref.unref(editor);
            }
            result
        })
    }

    /// Wraps the matching nodes in a copy of `element`.
    ///
    /// Consecutive matches under the same parent share one wrapper. An inline
    /// wrapper is applied per block.
    pub fn wrap_nodes(&mut self, element: Element, options: NodeOptions) -> EditorResult<()> {
        let at = self.resolve_at(options.at.clone())?;
        let explicit = options.at.is_some();
        let inline = self.is_inline(&element);
        let matcher = match (&options.matcher, &at) {
            (Some(matcher), _) => matcher.clone(),
            (None, Location::Path(path)) => Matcher::at(path.clone()),
            (None, _) if inline => inline_or_text(),
            (None, _) => Matcher::Block,
        };
        let voids = options.voids;

        self.without_normalizing(|editor| {
            let mut at = at;
            if let (true, Location::Range(range)) = (options.split, at.clone()) {
                let (start, end) = range.edges();
                let range_ref = editor.range_ref(range, Some(RangeAffinity::Inward));
                let result = (|| -> EditorResult<()> {
                    editor.split_nodes(NodeOptions {
                        matcher: Some(matcher.clone()),
                        voids,
                        ..NodeOptions::at(end)
                    })?;
                    editor.split_nodes(NodeOptions {
                        matcher: Some(matcher.clone()),
                        voids,
                        ..NodeOptions::at(start)
                    })
                })();
                let current = range_ref.unref(editor);
                result?;
                let Some(current) = current else {
                    return Ok(());
                };
                if !explicit {
                    editor.select(current.clone())?;
                }
                at = Location::Range(current);
            }

            let root_matcher = if inline {
                Matcher::Block
            } else {
                Matcher::predicate(|node, _, _| node.is_root())
            };
            let roots = editor.node_paths(
                &NodesOptions::at(at.clone())
                    .matching(root_matcher)
                    .mode(Mode::Lowest)
                    .voids(voids),
            )?;

            for root_path in roots {
                let target = match &at {
                    Location::Range(range) => {
                        match range.intersection(&editor.range(root_path.clone())?) {
                            Some(intersection) => Location::Range(intersection),
                            None => continue,
                        }
                    }
                    at => at.clone(),
                };
                let matches = editor.node_paths(
                    &NodesOptions::at(target)
                        .matching(matcher.clone())
                        .mode(options.mode)
                        .voids(voids),
                )?;
                let (Some(first), Some(last)) = (matches.first(), matches.last()) else {
                    continue;
                };
                if first.is_root() && last.is_root() {
                    continue;
                }

                let common = if first == last {
                    first.parent()?
                } else {
                    first.common(last)
                };
                let range = editor.range_between(first.clone(), last.clone())?;
                let wrapper_path = last.truncate(common.len() + 1).next()?;
                let wrapper = Element {
                    children: Vec::new(),
                    properties: element.properties.clone(),
                };

                editor.insert_node(
                    wrapper,
                    NodeOptions {
                        voids,
                        ..NodeOptions::at(wrapper_path.clone())
                    },
                )?;
                editor.move_nodes(
                    wrapper_path.child(0),
                    NodeOptions {
                        matcher: Some(Matcher::predicate(move |_, candidate, _| {
                            candidate.is_child_of(&common)
                        })),
                        voids,
                        ..NodeOptions::at(range)
                    },
                )?;
            }
            Ok(())
        })
    }

    /// Deletes an expanded range and returns where its end ended up; a
    /// collapsed range is just its anchor
    fn delete_to_end(&mut self, range: Range, voids: bool) -> EditorResult<Option<Point>> {
        if range.is_collapsed() {
            return Ok(Some(range.anchor));
        }
        let end_ref = self.point_ref(range.end(), Some(Affinity::Forward));
        let deleted = self.delete(DeleteOptions {
            voids,
            ..DeleteOptions::at(range)
        });
        let end = end_ref.unref(self);
        deleted?;
        Ok(end)
    }

    /// Path refs for every node `at` covers that matches
    fn track_matches(
        &mut self,
        at: &Location,
        matcher: Matcher,
        mode: Mode,
        voids: bool,
    ) -> EditorResult<Vec<PathRef>> {
        let paths = self.node_paths(
            &NodesOptions::at(at.clone())
                .matching(matcher)
                .mode(mode)
                .voids(voids),
        )?;
        Ok(paths
            .into_iter()
            .map(|path| self.path_ref(path, Some(Affinity::Forward)))
            .collect())
    }

    /// Runs `f` on each ref that still points somewhere. Every ref is
    /// released; after the first error the rest are only released.
    fn for_each_ref<F>(&mut self, refs: Vec<PathRef>, mut f: F) -> EditorResult<()>
    where
        F: FnMut(&mut Editor, Path) -> EditorResult<()>,
    {
        let mut result = Ok(());
        for path_ref in refs {
            let path = path_ref.unref(self);
            if result.is_err() {
                continue;
            }
            if let Some(path) = path {
                result = f(self, path);
            }
        }
        result
    }

    fn remove_node_at(&mut self, path: &Path) -> EditorResult<()> {
        let node = self
            .document
            .node(path)?
            .to_node()
            .ok_or_else(|| EditorError::invalid_transform("cannot remove the root"))?;
        self.apply(Operation::RemoveNode {
            path: path.clone(),
            node,
        })
    }

    /// Where a node of this kind can be inserted among the nodes at a point
    fn insert_matcher(&self, node: &Node) -> Matcher {
        match node {
            Node::Text(_) => Matcher::Text,
            Node::Element(element) if self.is_inline(element) => inline_or_text(),
            Node::Element(_) => Matcher::Block,
        }
    }
}

fn inline_or_text() -> Matcher {
    Matcher::predicate(|node, _, schema| {
        node.is_text() || node.as_element().is_some_and(|element| schema.is_inline(element))
    })
}

/// True when removing the single leaf under `node` would leave it empty
fn has_single_child_nest(node: NodeRef<'_>, schema: &dyn Schema) -> bool {
    match node {
        NodeRef::Element(element) if schema.is_void(element) => true,
        NodeRef::Element(element) => match element.children.as_slice() {
            [only] => has_single_child_nest(only.view(), schema),
            _ => false,
        },
        NodeRef::Root(_) => false,
        NodeRef::Text(_) => true,
    }
}

/// Old and new values of the keys in `props` that differ from `own`
fn property_changes(own: &Properties, props: &Properties) -> Option<(Properties, Properties)> {
    let mut old = Properties::new();
    let mut new = Properties::new();
    let mut changed = false;

    for (key, value) in props {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        let current = own.get(key);
        let wanted = (!value.is_null()).then_some(value);
        if current == wanted {
            continue;
        }
        changed = true;
        if let Some(current) = current {
            old.insert(key.clone(), current.clone());
        }
        if let Some(wanted) = wanted {
            new.insert(key.clone(), wanted.clone());
        }
    }

    changed.then_some((old, new))
}
