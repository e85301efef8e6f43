//! # Editor queries
//!
//! Read-only lookups that resolve locations against the current document
//! and selection. When a query's `at` is left out it falls back to the
//! selection; transforms use the same resolution.

use crate::editor::Editor;
use crate::errors::{EditorError, EditorResult};
use quire_model::{
    Edge, Element, Entry, Location, LocationError, Matcher, Node, NodeRef, Path, Point, Range,
    Span, Text, Walk,
};
use std::cmp::Ordering;

/// Where a node walk runs: a resolved location or a raw pair of paths
#[derive(Debug, Clone, PartialEq)]
pub enum At {
    Location(Location),
    Span(Span),
}

impl From<Location> for At {
    fn from(location: Location) -> Self {
        At::Location(location)
    }
}

impl From<Path> for At {
    fn from(path: Path) -> Self {
        At::Location(Location::Path(path))
    }
}

impl From<Point> for At {
    fn from(point: Point) -> Self {
        At::Location(Location::Point(point))
    }
}

impl From<Range> for At {
    fn from(range: Range) -> Self {
        At::Location(Location::Range(range))
    }
}

impl From<Span> for At {
    fn from(span: Span) -> Self {
        At::Span(span)
    }
}

/// Which of the nested matches a walk reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    All,
    /// Only the outermost match of each branch
    Highest,
    /// Only the innermost match of each branch
    Lowest,
}

/// Step size for cursor positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Offset,
    Character,
    Word,
    Line,
    Block,
}

#[derive(Debug, Clone, Default)]
pub struct NodesOptions {
    pub at: Option<At>,
    pub matcher: Matcher,
    pub mode: Mode,
    /// Every leaf branch of the walk must contain a match, or nothing is
    /// returned
    pub universal: bool,
    pub reverse: bool,
    /// Also walk into void elements
    pub voids: bool,
}

impl NodesOptions {
    pub fn at(at: impl Into<At>) -> Self {
        Self {
            at: Some(at.into()),
            ..Self::default()
        }
    }

    pub fn matching(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn universal(mut self) -> Self {
        self.universal = true;
        self
    }

    pub fn voids(mut self, voids: bool) -> Self {
        self.voids = voids;
        self
    }
}

/// Options for `above`, `void`, `previous` and `next`
#[derive(Debug, Clone)]
pub struct AboveOptions {
    pub at: Option<Location>,
    /// `None` means any node for `above`; `previous`/`next` fall back to
    /// siblings of a path, or any node
    pub matcher: Option<Matcher>,
    pub mode: Mode,
    pub voids: bool,
}

impl Default for AboveOptions {
    fn default() -> Self {
        Self {
            at: None,
            matcher: None,
            mode: Mode::Lowest,
            voids: false,
        }
    }
}

impl AboveOptions {
    pub fn at(at: impl Into<Location>) -> Self {
        Self {
            at: Some(at.into()),
            ..Self::default()
        }
    }

    pub fn matching(mut self, matcher: Matcher) -> Self {
        self.matcher = Some(matcher);
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn voids(mut self, voids: bool) -> Self {
        self.voids = voids;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct LevelsOptions {
    pub at: Option<Location>,
    pub matcher: Matcher,
    pub reverse: bool,
    pub voids: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PositionsOptions {
    pub at: Option<Location>,
    pub unit: Unit,
    pub reverse: bool,
    pub voids: bool,
}

/// How far `before`/`after` look
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Distance {
    pub distance: usize,
    pub unit: Unit,
    pub voids: bool,
}

impl Default for Distance {
    fn default() -> Self {
        Self {
            distance: 1,
            unit: Unit::Offset,
            voids: false,
        }
    }
}

impl Distance {
    pub fn new(distance: usize, unit: Unit) -> Self {
        Self {
            distance,
            unit,
            voids: false,
        }
    }
}

impl Editor {
    /// `at`, or the selection when `at` is missing
    pub(crate) fn at_or_selection(&self, at: Option<Location>) -> Option<Location> {
        at.or_else(|| self.selection().cloned().map(Location::Range))
    }

    /// Like `at_or_selection`, failing when neither exists
    pub(crate) fn resolve_at(&self, at: Option<Location>) -> EditorResult<Location> {
        self.at_or_selection(at).ok_or(EditorError::NoSelection)
    }

    /// Nodes in the span of `at`, filtered by matcher and mode
    pub fn nodes(&self, options: &NodesOptions) -> EditorResult<Vec<Entry<'_>>> {
        let at = match &options.at {
            Some(at) => at.clone(),
            None => match self.selection() {
                Some(selection) => At::Location(Location::Range(selection.clone())),
                None => return Ok(Vec::new()),
            },
        };

        let (from, to) = match at {
            At::Span(span) => (span.from, span.to),
            At::Location(location) => {
                let first = self.path(location.clone(), Some(Edge::Start))?;
                let last = self.path(location, Some(Edge::End))?;
                if options.reverse {
                    (last, first)
                } else {
                    (first, last)
                }
            }
        };

        let schema = self.schema();
        let voids = options.voids;
        let pass = |node: NodeRef<'_>, _: &Path| {
            !voids && node.as_element().is_some_and(|element| schema.is_void(element))
        };
        let walk = Walk {
            from: Some(from),
            to: Some(to),
            reverse: options.reverse,
            pass: Some(&pass),
        };

        let mut matches = Vec::new();
        let mut hit: Option<Entry<'_>> = None;

        for (node, path) in self.document.nodes(&walk) {
            let is_lower = hit
                .as_ref()
                .is_some_and(|(_, hit_path)| path.compare(hit_path) == Ordering::Equal);

            if options.mode == Mode::Highest && is_lower {
                continue;
            }

            if !options.matcher.matches(node, &path, schema) {
                // a leaf outside the last hit means some branch has no match
                if options.universal && !is_lower && node.is_text() {
                    return Ok(Vec::new());
                }
                continue;
            }

            if options.mode == Mode::Lowest && is_lower {
                hit = Some((node, path));
                continue;
            }

            let emit = if options.mode == Mode::Lowest {
                hit.take()
            } else {
                Some((node, path.clone()))
            };
            matches.extend(emit);
            hit = Some((node, path));
        }

        if options.mode == Mode::Lowest {
            matches.extend(hit);
        }
        Ok(matches)
    }

    /// Paths of [`Editor::nodes`], for callers about to mutate the tree
    pub fn node_paths(&self, options: &NodesOptions) -> EditorResult<Vec<Path>> {
        Ok(self
            .nodes(options)?
            .into_iter()
            .map(|(_, path)| path)
            .collect())
    }

    /// The path `at` resolves to. Without an edge a range resolves to the
    /// common ancestor of its ends; with one, paths descend to their first
    /// or last leaf.
    pub fn path(&self, at: impl Into<Location>, edge: Option<Edge>) -> EditorResult<Path> {
        let path = match at.into() {
            Location::Path(path) => match edge {
                Some(Edge::Start) => self.document.first(&path)?.1,
                Some(Edge::End) => self.document.last(&path)?.1,
                None => path,
            },
            Location::Range(range) => match edge {
                Some(Edge::Start) => range.start().path,
                Some(Edge::End) => range.end().path,
                None => range.anchor.path.common(&range.focus.path),
            },
            Location::Point(point) => point.path,
        };
        Ok(path)
    }

    pub fn point(&self, at: impl Into<Location>, edge: Edge) -> EditorResult<Point> {
        match at.into() {
            Location::Path(path) => {
                let (node, leaf_path) = match edge {
                    Edge::Start => self.document.first(&path)?,
                    Edge::End => self.document.last(&path)?,
                };
                let text = node
                    .as_text()
                    .ok_or_else(|| LocationError::not_text(&leaf_path))?;
                let offset = match edge {
                    Edge::Start => 0,
                    Edge::End => text.len(),
                };
                Ok(Point::new(leaf_path, offset))
            }
            Location::Range(range) => Ok(match edge {
                Edge::Start => range.start(),
                Edge::End => range.end(),
            }),
            Location::Point(point) => Ok(point),
        }
    }

    pub fn start(&self, at: impl Into<Location>) -> EditorResult<Point> {
        self.point(at, Edge::Start)
    }

    pub fn end(&self, at: impl Into<Location>) -> EditorResult<Point> {
        self.point(at, Edge::End)
    }

    /// A range covering `at`; ranges come back unchanged
    pub fn range(&self, at: impl Into<Location>) -> EditorResult<Range> {
        match at.into() {
            Location::Range(range) => Ok(range),
            location => Ok(Range::new(self.start(location.clone())?, self.end(location)?)),
        }
    }

    /// From the start of `from` to the end of `to`
    pub fn range_between(
        &self,
        from: impl Into<Location>,
        to: impl Into<Location>,
    ) -> EditorResult<Range> {
        Ok(Range::new(self.start(from)?, self.end(to)?))
    }

    pub fn node(&self, at: impl Into<Location>) -> EditorResult<Entry<'_>> {
        let path = self.path(at, None)?;
        Ok((self.document.node(&path)?, path))
    }

    pub fn parent(&self, at: impl Into<Location>) -> EditorResult<Entry<'_>> {
        let path = self.path(at, None)?;
        Ok(self.document.parent(&path)?)
    }

    /// The text leaf at `at`
    pub fn leaf(&self, at: impl Into<Location>) -> EditorResult<(&Text, Path)> {
        let path = self.path(at, None)?;
        Ok((self.document.leaf(&path)?, path))
    }

    pub fn first(&self, at: impl Into<Location>) -> EditorResult<Entry<'_>> {
        let path = self.path(at, Some(Edge::Start))?;
        Ok((self.document.node(&path)?, path))
    }

    pub fn last(&self, at: impl Into<Location>) -> EditorResult<Entry<'_>> {
        let path = self.path(at, Some(Edge::End))?;
        Ok((self.document.node(&path)?, path))
    }

    /// Matching nodes from the root down to `at`, stopping at the first void
    /// unless `voids` is set
    pub fn levels(&self, options: &LevelsOptions) -> EditorResult<Vec<Entry<'_>>> {
        let Some(at) = self.at_or_selection(options.at.clone()) else {
            return Ok(Vec::new());
        };
        let path = self.path(at, None)?;
        let schema = self.schema();

        let mut levels = Vec::new();
        for (node, level) in self.document.root().levels(&path)? {
            if !options.matcher.matches(node, &level, schema) {
                continue;
            }
            let is_void = node
                .as_element()
                .is_some_and(|element| schema.is_void(element));
            levels.push((node, level));
            if !options.voids && is_void {
                break;
            }
        }

        if options.reverse {
            levels.reverse();
        }
        Ok(levels)
    }

    /// The closest (or, in highest mode, furthest) matching ancestor of `at`
    pub fn above(&self, options: &AboveOptions) -> EditorResult<Option<Entry<'_>>> {
        let Some(at) = self.at_or_selection(options.at.clone()) else {
            return Ok(None);
        };
        let path = self.path(at.clone(), None)?;
        let levels = self.levels(&LevelsOptions {
            at: Some(Location::Path(path.clone())),
            matcher: options.matcher.clone().unwrap_or_default(),
            reverse: options.mode == Mode::Lowest,
            voids: options.voids,
        })?;

        for (node, level) in levels {
            if node.is_text() {
                continue;
            }
            let found = match &at {
                Location::Range(range) => {
                    level.is_ancestor_of(&range.anchor.path) && level.is_ancestor_of(&range.focus.path)
                }
                _ => level != path,
            };
            if found {
                return Ok(Some((node, level)));
            }
        }
        Ok(None)
    }

    /// The void element above `at`, if any
    pub fn void(&self, options: &AboveOptions) -> EditorResult<Option<Entry<'_>>> {
        self.above(&AboveOptions {
            matcher: Some(Matcher::Void),
            ..options.clone()
        })
    }

    /// The first matching node before `at` in document order
    pub fn previous(&self, options: &AboveOptions) -> EditorResult<Option<Entry<'_>>> {
        let Some(at) = self.at_or_selection(options.at.clone()) else {
            return Ok(None);
        };
        if matches!(&at, Location::Path(path) if path.is_root()) {
            return Err(EditorError::invalid_transform(
                "cannot get the previous node of the root",
            ));
        }
        let distance = Distance {
            voids: options.voids,
            ..Distance::default()
        };
        let Some(before) = self.before(at.clone(), distance)? else {
            return Ok(None);
        };
        let (_, to) = self.document.first(&Path::root())?;
        let entries = self.nodes(&NodesOptions {
            at: Some(At::Span(Span::new(before.path, to))),
            matcher: sibling_matcher(options.matcher.clone(), &at)?,
            mode: options.mode,
            reverse: true,
            voids: options.voids,
            universal: false,
        })?;
        Ok(entries.into_iter().next())
    }

    /// The first matching node after `at` in document order
    pub fn next(&self, options: &AboveOptions) -> EditorResult<Option<Entry<'_>>> {
        let Some(at) = self.at_or_selection(options.at.clone()) else {
            return Ok(None);
        };
        if matches!(&at, Location::Path(path) if path.is_root()) {
            return Err(EditorError::invalid_transform(
                "cannot get the next node of the root",
            ));
        }
        let distance = Distance {
            voids: options.voids,
            ..Distance::default()
        };
        let Some(after) = self.after(at.clone(), distance)? else {
            return Ok(None);
        };
        let (_, to) = self.document.last(&Path::root())?;
        let entries = self.nodes(&NodesOptions {
            at: Some(At::Span(Span::new(after.path, to))),
            matcher: sibling_matcher(options.matcher.clone(), &at)?,
            mode: options.mode,
            reverse: false,
            voids: options.voids,
            universal: false,
        })?;
        Ok(entries.into_iter().next())
    }

    /// Text content of the range `at` covers
    pub fn string(&self, at: impl Into<Location>, voids: bool) -> EditorResult<String> {
        let range = self.range(at)?;
        let (start, end) = range.edges();
        let mut out = String::new();

        let texts = self.nodes(
            &NodesOptions::at(range)
                .matching(Matcher::Text)
                .voids(voids),
        )?;
        for (node, path) in texts {
            let Some(text) = node.as_text() else { continue };
            let from = if path == start.path { start.offset } else { 0 };
            let to = if path == end.path { end.offset } else { text.len() };
            out.push_str(text.slice(from, to));
        }
        Ok(out)
    }

    pub fn is_start(&self, point: &Point, at: impl Into<Location>) -> EditorResult<bool> {
        Ok(point.offset == 0 && *point == self.start(at)?)
    }

    pub fn is_end(&self, point: &Point, at: impl Into<Location>) -> EditorResult<bool> {
        Ok(*point == self.end(at)?)
    }

    pub fn is_edge(&self, point: &Point, at: impl Into<Location>) -> EditorResult<bool> {
        let at = at.into();
        Ok(self.is_start(point, at.clone())? || self.is_end(point, at)?)
    }

    pub fn is_void(&self, element: &Element) -> bool {
        self.schema().is_void(element)
    }

    pub fn is_inline(&self, element: &Element) -> bool {
        self.schema().is_inline(element)
    }

    pub fn is_block(&self, element: &Element) -> bool {
        !self.is_inline(element)
    }

    /// No children, or a single empty text in a non-void element
    pub fn is_empty(&self, element: &Element) -> bool {
        match element.children.as_slice() {
            [] => true,
            [Node::Text(text)] => text.is_empty() && !self.is_void(element),
            _ => false,
        }
    }

    pub fn has_blocks(&self, element: &Element) -> bool {
        element
            .children
            .iter()
            .any(|child| matches!(child, Node::Element(e) if self.is_block(e)))
    }

    pub fn has_inlines(&self, element: &Element) -> bool {
        element.children.iter().any(|child| match child {
            Node::Text(_) => true,
            Node::Element(e) => self.is_inline(e),
        })
    }

    pub fn has_texts(&self, element: &Element) -> bool {
        element.children.iter().all(Node::is_text)
    }

    /// Every cursor position in `at`, stepping by `unit` through the text of
    /// each block
    pub fn positions(&self, options: &PositionsOptions) -> EditorResult<Vec<Point>> {
        let Some(at) = self.at_or_selection(options.at.clone()) else {
            return Ok(Vec::new());
        };
        let reverse = options.reverse;
        let range = self.range(at.clone())?;
        let (start, end) = range.edges();
        let first = if reverse { end.clone() } else { start.clone() };

        let mut positions = Vec::new();
        let mut is_new_block = false;
        let mut block_text: Vec<char> = Vec::new();
        let mut distance: isize = 0;

        let entries = self.nodes(&NodesOptions {
            at: Some(At::Location(at)),
            reverse,
            voids: options.voids,
            ..NodesOptions::default()
        })?;

        for (node, path) in entries {
            match node {
                NodeRef::Element(element) => {
                    if !options.voids && self.is_void(element) {
                        positions.push(self.start(path)?);
                        continue;
                    }
                    if self.is_inline(element) {
                        continue;
                    }
                    if self.has_inlines(element) {
                        let e = if path.is_ancestor_of(&end.path) {
                            end.clone()
                        } else {
                            self.end(path.clone())?
                        };
                        let s = if path.is_ancestor_of(&start.path) {
                            start.clone()
                        } else {
                            self.start(path.clone())?
                        };
                        block_text = self.string(Range::new(s, e), options.voids)?.chars().collect();
                        is_new_block = true;
                    }
                }
                NodeRef::Text(text) => {
                    let length = text.len() as isize;
                    let (mut leaf_remaining, mut leaf_offset) = if path == first.path {
                        let offset = first.offset as isize;
                        (if reverse { offset } else { length - offset }, offset)
                    } else {
                        (length, if reverse { length } else { 0 })
                    };

                    if path == first.path || is_new_block || options.unit == Unit::Offset {
                        positions.push(Point::new(path.clone(), leaf_offset as usize));
                        is_new_block = false;
                    }

                    loop {
                        if distance == 0 {
                            if block_text.is_empty() {
                                break;
                            }
                            let step = unit_distance(&block_text, options.unit, reverse);
                            if reverse {
                                block_text.truncate(block_text.len() - step);
                            } else {
                                block_text.drain(..step);
                            }
                            distance = step as isize;
                        }

                        leaf_offset = if reverse {
                            leaf_offset - distance
                        } else {
                            leaf_offset + distance
                        };
                        leaf_remaining -= distance;

                        // the step ends in a later leaf
                        if leaf_remaining < 0 {
                            distance = -leaf_remaining;
                            break;
                        }

                        distance = 0;
                        positions.push(Point::new(path.clone(), leaf_offset as usize));
                    }
                }
                NodeRef::Root(_) => {}
            }
        }

        Ok(positions)
    }

    /// The point `distance` units before `at`, if the document has one
    pub fn before(&self, at: impl Into<Location>, distance: Distance) -> EditorResult<Option<Point>> {
        let anchor = self.start(Path::root())?;
        let focus = self.point(at, Edge::Start)?;
        let positions = self.positions(&PositionsOptions {
            at: Some(Range::new(anchor, focus).into()),
            unit: distance.unit,
            reverse: true,
            voids: distance.voids,
        })?;
        Ok(positions.into_iter().skip(1).take(distance.distance).last())
    }

    /// The point `distance` units after `at`, if the document has one
    pub fn after(&self, at: impl Into<Location>, distance: Distance) -> EditorResult<Option<Point>> {
        let anchor = self.point(at, Edge::End)?;
        let focus = self.end(Path::root())?;
        let positions = self.positions(&PositionsOptions {
            at: Some(Range::new(anchor, focus).into()),
            unit: distance.unit,
            reverse: false,
            voids: distance.voids,
        })?;
        Ok(positions.into_iter().skip(1).take(distance.distance).last())
    }

    /// Pulls the end of a range that hangs at offset 0 of the next block back
    /// to the end of the last non-empty text inside the range
    pub fn unhang_range(&self, range: Range, voids: bool) -> EditorResult<Range> {
        let (start, end) = range.edges();
        if start.offset != 0 || end.offset != 0 || range.is_collapsed() || end.path.has_previous() {
            return Ok(range);
        }

        let block_path = self
            .above(
                &AboveOptions::at(end.clone())
                    .matching(Matcher::Block)
                    .voids(voids),
            )?
            .map(|(_, path)| path)
            .unwrap_or_default();

        let texts = self.nodes(
            &NodesOptions::at(Range::new(start.clone(), end.clone()))
                .matching(Matcher::Text)
                .reversed()
                .voids(voids),
        )?;
        for (node, path) in texts.into_iter().skip(1) {
            let Some(text) = node.as_text() else { continue };
            if !text.is_empty() || path.is_before(&block_path) {
                return Ok(Range::new(start, Point::new(path, text.len())));
            }
        }
        Ok(Range::new(start, end))
    }
}

/// The matcher `previous`/`next` use when none is given: siblings of a
/// path, anything otherwise
fn sibling_matcher(matcher: Option<Matcher>, at: &Location) -> EditorResult<Matcher> {
    if let Some(matcher) = matcher {
        return Ok(matcher);
    }
    Ok(match at {
        Location::Path(path) => {
            let parent = path.parent()?;
            Matcher::predicate(move |_, candidate, _| candidate.is_child_of(&parent))
        }
        _ => Matcher::Any,
    })
}

fn unit_distance(text: &[char], unit: Unit, reverse: bool) -> usize {
    match unit {
        Unit::Offset | Unit::Character => 1,
        Unit::Word => word_distance(text, reverse),
        Unit::Line | Unit::Block => text.len(),
    }
}

/// Leading separators plus the word after them
fn word_distance(text: &[char], reverse: bool) -> usize {
    let mut distance = 0;
    let mut started = false;
    for index in 0..text.len() {
        let c = if reverse {
            text[text.len() - 1 - index]
        } else {
            text[index]
        };
        if c.is_alphanumeric() || c == '_' {
            started = true;
        } else if started {
            break;
        }
        distance += 1;
    }
    distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_model::Document;

    fn editor() -> Editor {
        Editor::new(Document::new(vec![
            Element::of_type("paragraph")
                .with_child(Text::new("one "))
                .with_child(Element::of_type("link").inline().with_child(Text::new("two")))
                .with_child(Text::new(" three"))
                .into(),
            Element::of_type("image").void().with_child(Text::new("")).into(),
            Element::of_type("paragraph")
                .with_child(Text::new("four"))
                .into(),
        ]))
    }

    #[test]
    fn test_word_distance() {
        let text: Vec<char> = "  hello, world".chars().collect();
        assert_eq!(word_distance(&text, false), 7);
        assert_eq!(word_distance(&text, true), 5);
    }

    #[test]
    fn test_nodes_modes() {
        let editor = editor();
        let blocks = editor
            .node_paths(&NodesOptions::at(Path::root()).matching(Matcher::Element).mode(Mode::Highest))
            .unwrap();
        assert_eq!(blocks, vec![Path::from([0]), [1].into(), [2].into()]);

        let lowest = editor
            .node_paths(&NodesOptions::at(Path::from([0])).matching(Matcher::Element).mode(Mode::Lowest))
            .unwrap();
        assert_eq!(lowest, vec![Path::from([0, 1])]);
    }

    #[test]
    fn test_nodes_skip_void_contents_unless_asked() {
        let editor = editor();
        let texts = editor
            .node_paths(&NodesOptions::at(Path::root()).matching(Matcher::Text))
            .unwrap();
        assert!(!texts.contains(&[1, 0].into()));

        let texts = editor
            .node_paths(&NodesOptions::at(Path::root()).matching(Matcher::Text).voids(true))
            .unwrap();
        assert!(texts.contains(&[1, 0].into()));
    }

    #[test]
    fn test_universal_requires_a_match_in_every_branch() {
        let editor = editor();
        let universal = editor
            .node_paths(&NodesOptions::at(Path::from([0])).matching(Matcher::kind("link")).universal())
            .unwrap();
        assert!(universal.is_empty());
    }

    #[test]
    fn test_points_and_string() {
        let editor = editor();
        assert_eq!(editor.start(Path::from([0])).unwrap(), Point::new([0, 0], 0));
        assert_eq!(editor.end(Path::from([0])).unwrap(), Point::new([0, 2], 6));
        assert_eq!(editor.string(Path::from([0]), false).unwrap(), "one two three");
        let range = Range::new(Point::new([0, 0], 2), Point::new([0, 2], 3));
        assert_eq!(editor.string(range, false).unwrap(), "e two th");
    }

    #[test]
    fn test_above_and_void() {
        let editor = editor();
        let (_, link) = editor
            .above(&AboveOptions::at(Point::new([0, 1, 0], 1)).matching(Matcher::Inline))
            .unwrap()
            .unwrap();
        assert_eq!(link, Path::from([0, 1]));

        let (_, block) = editor
            .above(
                &AboveOptions::at(Point::new([0, 1, 0], 1))
                    .matching(Matcher::Block)
                    .mode(Mode::Highest),
            )
            .unwrap()
            .unwrap();
        assert_eq!(block, Path::from([0]));

        let void = editor.void(&AboveOptions::at(Point::new([1, 0], 0))).unwrap();
        assert_eq!(void.map(|(_, path)| path), Some(Path::from([1])));
        assert!(editor
            .void(&AboveOptions::at(Point::new([0, 0], 0)))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_before_and_after_by_unit() {
        let editor = editor();
        let at = Point::new([0, 0], 0);
        assert_eq!(
            editor.after(at.clone(), Distance::new(1, Unit::Character)).unwrap(),
            Some(Point::new([0, 0], 1))
        );
        assert_eq!(
            editor.after(at.clone(), Distance::new(1, Unit::Word)).unwrap(),
            Some(Point::new([0, 0], 3))
        );
        assert_eq!(
            editor.after(Point::new([0, 0], 3), Distance::new(1, Unit::Word)).unwrap(),
            Some(Point::new([0, 1, 0], 3))
        );
        assert_eq!(
            editor.after(at.clone(), Distance::new(1, Unit::Block)).unwrap(),
            Some(Point::new([0, 2], 6))
        );
        assert_eq!(editor.before(at, Distance::default()).unwrap(), None);
        assert_eq!(
            editor.before(Point::new([2, 0], 0), Distance::default()).unwrap(),
            Some(Point::new([1, 0], 0))
        );
    }

    #[test]
    fn test_previous_and_next_siblings() {
        let editor = editor();
        let (_, previous) = editor
            .previous(&AboveOptions::at(Path::from([2])))
            .unwrap()
            .unwrap();
        assert_eq!(previous, Path::from([1]));

        let (_, next) = editor
            .next(&AboveOptions::at(Path::from([0])))
            .unwrap()
            .unwrap();
        assert_eq!(next, Path::from([1]));

        assert!(editor.previous(&AboveOptions::at(Path::root())).is_err());
    }

    #[test]
    fn test_element_predicates() {
        let editor = editor();
        let paragraph = editor.children()[0].as_element().unwrap();
        let image = editor.children()[1].as_element().unwrap();
        assert!(editor.has_inlines(paragraph));
        assert!(!editor.has_texts(paragraph));
        assert!(!editor.is_empty(image));
        assert!(editor.is_void(image));
        assert!(editor.is_empty(&Element::of_type("p").with_child(Text::new(""))));
    }

    #[test]
    fn test_unhang_range() {
        let editor = editor();
        let hanging = Range::new(Point::new([0, 0], 0), Point::new([2, 0], 0));
        let unhung = editor.unhang_range(hanging, false).unwrap();
        assert_eq!(unhung.focus, Point::new([0, 2], 6));
    }
}
