//! Text transforms: typing and deleting

use crate::editor::Editor;
use crate::errors::EditorResult;
use crate::queries::{AboveOptions, Distance, Mode, NodesOptions, Unit};
use crate::transforms::NodeOptions;
use quire_model::{Affinity, Location, Matcher, Operation, Path, Point, Range};
use std::cmp::Ordering;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct TextOptions {
    pub at: Option<Location>,
    pub voids: bool,
}

impl TextOptions {
    pub fn at(at: impl Into<Location>) -> Self {
        Self {
            at: Some(at.into()),
            voids: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeleteOptions {
    pub at: Option<Location>,
    /// How far a collapsed target reaches
    pub distance: usize,
    pub unit: Unit,
    /// Delete backwards from a collapsed target
    pub reverse: bool,
    pub hanging: bool,
    pub voids: bool,
}

impl Default for DeleteOptions {
    fn default() -> Self {
        Self {
            at: None,
            distance: 1,
            unit: Unit::Character,
            reverse: false,
            hanging: false,
            voids: false,
        }
    }
}

impl DeleteOptions {
    pub fn at(at: impl Into<Location>) -> Self {
        Self {
            at: Some(at.into()),
            ..Self::default()
        }
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }
}

impl Editor {
    /// Inserts `text` at a point, replacing the content of an expanded range
    /// first. Text is never inserted inside a void unless `voids` is set.
    pub fn insert_text(&mut self, text: &str, options: TextOptions) -> EditorResult<()> {
        let at = self.resolve_at(options.at.clone())?;
        let voids = options.voids;

        self.without_normalizing(|editor| {
            let at = match at {
                Location::Path(path) => Location::Range(editor.range(path)?),
                at => at,
            };

            let point = match at {
                Location::Range(range) if range.is_collapsed() => range.anchor,
                Location::Range(range) => {
                    let end = range.end();
                    if !voids && editor.void(&AboveOptions::at(end.clone()))?.is_some() {
                        return Ok(());
                    }
                    let start_ref = editor.point_ref(range.start(), Some(Affinity::Forward));
                    let end_ref = editor.point_ref(end, Some(Affinity::Forward));
                    let deleted = editor.delete(DeleteOptions {
                        at: Some(range.into()),
                        voids,
                        ..DeleteOptions::default()
                    });
                    let start = start_ref.unref(editor);
                    let end = end_ref.unref(editor);
                    deleted?;
                    let Some(point) = start.or(end) else {
                        return Ok(());
                    };
                    editor.set_selection(Range::collapsed(point.clone()).into())?;
                    point
                }
                Location::Point(point) => point,
                Location::Path(_) => return Ok(()),
            };

            if !voids && editor.void(&AboveOptions::at(point.clone()))?.is_some() {
                return Ok(());
            }
            if !text.is_empty() {
                editor.apply(Operation::InsertText {
                    path: point.path,
                    offset: point.offset,
                    text: text.to_string(),
                })?;
            }
            Ok(())
        })
    }

    /// Deletes the content of a range, or `distance` units from a point.
    ///
    /// Blocks the range spans are merged afterwards. A collapsed target
    /// inside a void removes the whole void.
    pub fn delete(&mut self, options: DeleteOptions) -> EditorResult<()> {
        let at = self.resolve_at(options.at.clone())?;
        let explicit = options.at.is_some();
        let voids = options.voids;

        self.without_normalizing(|editor| {
            let mut hanging = options.hanging;
            let mut at = match at {
                Location::Range(range) if range.is_collapsed() => Location::Point(range.anchor),
                at => at,
            };

            if let Location::Point(point) = at.clone() {
                let furthest_void = editor.void(&AboveOptions::at(point.clone()).mode(Mode::Highest))?;
                at = match furthest_void {
                    Some((_, void_path)) if !voids => Location::Path(void_path),
                    _ => {
                        let distance = Distance::new(options.distance, options.unit);
                        let target = if options.reverse {
                            match editor.before(point.clone(), distance)? {
                                Some(target) => target,
                                None => editor.start(Path::root())?,
                            }
                        } else {
                            match editor.after(point.clone(), distance)? {
                                Some(target) => target,
                                None => editor.end(Path::root())?,
                            }
                        };
                        hanging = true;
                        Location::Range(Range::new(point, target))
                    }
                };
            }

            let mut range = match at {
                Location::Path(path) => {
                    return editor.remove_nodes(NodeOptions {
                        voids,
                        ..NodeOptions::at(path)
                    });
                }
                Location::Range(range) => range,
                Location::Point(_) => return Ok(()),
            };
            if range.is_collapsed() {
                return Ok(());
            }

            if !hanging && range.end() != editor.end(Path::root())? {
                range = editor.unhang_range(range, voids)?;
            }

            let (mut start, mut end) = range.edges();
            let block_of = |editor: &Editor, point: &Point| -> EditorResult<Option<Path>> {
                Ok(editor
                    .above(&AboveOptions::at(point.clone()).matching(Matcher::Block).voids(voids))?
                    .map(|(_, path)| path))
            };
            let start_block = block_of(editor, &start)?;
            let end_block = block_of(editor, &end)?;
            let across_blocks = matches!((&start_block, &end_block), (Some(s), Some(e)) if s != e);
            let single_text = start.path == end.path;

            let highest_void = |editor: &Editor, point: &Point| -> EditorResult<bool> {
                Ok(!voids
                    && editor
                        .void(&AboveOptions::at(point.clone()).mode(Mode::Highest))?
                        .is_some())
            };
            let start_in_void = highest_void(editor, &start)?;
            let end_in_void = highest_void(editor, &end)?;

            // inline voids are stepped out of, within their block
            if start_in_void {
                if let (Some(before), Some(block)) =
                    (editor.before(start.clone(), Distance::default())?, &start_block)
                {
                    if block.is_ancestor_of(&before.path) {
                        start = before;
                    }
                }
            }
            if end_in_void {
                if let (Some(after), Some(block)) =
                    (editor.after(end.clone(), Distance::default())?, &end_block)
                {
                    if block.is_ancestor_of(&after.path) {
                        end = after;
                    }
                }
            }

            // highest nodes fully inside the range, plus voids
            let mut covered: Vec<Path> = Vec::new();
            for (node, path) in editor.nodes(&NodesOptions::at(range.clone()).voids(voids))? {
                if covered
                    .last()
                    .is_some_and(|last| path.compare(last) == Ordering::Equal)
                {
                    continue;
                }
                let is_void = !voids
                    && node
                        .as_element()
                        .is_some_and(|element| editor.is_void(element));
                if is_void || (!path.is_common(&start.path) && !path.is_common(&end.path)) {
                    covered.push(path);
                }
            }

            let path_refs: Vec<_> = covered
                .into_iter()
                .map(|path| editor.path_ref(path, Some(Affinity::Forward)))
                .collect();
            let start_ref = editor.point_ref(start.clone(), Some(Affinity::Forward));
            let end_ref = editor.point_ref(end.clone(), Some(Affinity::Forward));

            let result = (|| -> EditorResult<()> {
                if !single_text && !start_in_void {
                    if let Some(point) = start_ref.current(editor) {
                        let leaf = editor.document().leaf(&point.path)?;
                        let text = leaf.slice(start.offset, leaf.len()).to_string();
                        if !text.is_empty() {
                            editor.apply(Operation::RemoveText {
                                path: point.path,
                                offset: start.offset,
                                text,
                            })?;
                        }
                    }
                }

                for path_ref in path_refs.into_iter().rev() {
                    if let Some(path) = path_ref.unref(editor) {
                        editor.remove_nodes(NodeOptions {
                            voids,
                            ..NodeOptions::at(path)
                        })?;
                    }
                }

                if !end_in_void {
                    if let Some(point) = end_ref.current(editor) {
                        let offset = if single_text { start.offset } else { 0 };
                        let leaf = editor.document().leaf(&point.path)?;
                        let text = leaf.slice(offset, end.offset).to_string();
                        if !text.is_empty() {
                            editor.apply(Operation::RemoveText {
                                path: point.path,
                                offset,
                                text,
                            })?;
                        }
                    }
                }

                if !single_text && across_blocks && start_ref.current(editor).is_some() {
                    if let Some(point) = end_ref.current(editor) {
                        editor.merge_nodes(NodeOptions {
                            hanging: true,
                            voids,
                            ..NodeOptions::at(point)
                        })?;
                    }
                }
                Ok(())
            })();

            let start = start_ref.unref(editor);
            let end = end_ref.unref(editor);
            result?;

            let point = if options.reverse {
                start.or(end)
            } else {
                end.or(start)
            };
            debug!(across_blocks, single_text, "deleted range");
            if !explicit {
                if let Some(point) = point {
                    editor.select(point)?;
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_model::{Document, Element, Text};

    fn editor(blocks: &[&str]) -> Editor {
        let mut editor = Editor::new(Document::new(
            blocks
                .iter()
                .map(|text| Element::of_type("paragraph").with_child(Text::new(*text)).into())
                .collect(),
        ));
        editor.normalize().unwrap();
        editor
    }

    fn text(editor: &Editor, block: usize) -> String {
        editor.document().string(&[block].into()).unwrap()
    }

    #[test]
    fn test_insert_text_at_point() {
        let mut editor = editor(&["word"]);
        editor
            .insert_text("X", TextOptions::at(Point::new([0, 0], 2)))
            .unwrap();
        assert_eq!(text(&editor, 0), "woXrd");
    }

    #[test]
    fn test_insert_text_without_location_or_selection() {
        let mut editor = editor(&["word"]);
        assert_eq!(
            editor.insert_text("X", TextOptions::default()),
            Err(crate::errors::EditorError::NoSelection)
        );
    }

    #[test]
    fn test_insert_text_replaces_expanded_selection() {
        let mut editor = editor(&["hello world"]);
        editor
            .select(Range::new(Point::new([0, 0], 0), Point::new([0, 0], 5)))
            .unwrap();
        editor.insert_text("howdy", TextOptions::default()).unwrap();
        assert_eq!(text(&editor, 0), "howdy world");
        assert_eq!(editor.selection(), Some(&Range::collapsed(Point::new([0, 0], 5))));
    }

    #[test]
    fn test_delete_backward_from_cursor() {
        let mut editor = editor(&["word"]);
        editor.select(Point::new([0, 0], 4)).unwrap();
        editor.delete(DeleteOptions::default().reversed()).unwrap();
        assert_eq!(text(&editor, 0), "wor");
        assert_eq!(editor.selection(), Some(&Range::collapsed(Point::new([0, 0], 3))));
    }

    #[test]
    fn test_delete_across_blocks_merges_them() {
        let mut editor = editor(&["one", "two", "three"]);
        editor
            .delete(DeleteOptions::at(Range::new(
                Point::new([0, 0], 1),
                Point::new([2, 0], 2),
            )))
            .unwrap();
        assert_eq!(editor.children().len(), 1);
        assert_eq!(text(&editor, 0), "oree");
    }

    #[test]
    fn test_delete_at_block_start_joins_with_previous() {
        let mut editor = editor(&["one", "two"]);
        editor.select(Point::new([1, 0], 0)).unwrap();
        editor.delete(DeleteOptions::default().reversed()).unwrap();
        assert_eq!(editor.children().len(), 1);
        assert_eq!(text(&editor, 0), "onetwo");
        assert_eq!(editor.selection(), Some(&Range::collapsed(Point::new([0, 0], 3))));
    }

    #[test]
    fn test_delete_word() {
        let mut editor = editor(&["hello world"]);
        editor.select(Point::new([0, 0], 11)).unwrap();
        editor
            .delete(DeleteOptions::default().reversed().unit(Unit::Word))
            .unwrap();
        assert_eq!(text(&editor, 0), "hello ");
    }

    #[test]
    fn test_delete_inside_void_removes_it() {
        let mut editor = Editor::new(Document::new(vec![
            Element::of_type("paragraph").with_child(Text::new("a")).into(),
            Element::of_type("image").void().with_child(Text::new("")).into(),
        ]));
        editor.normalize().unwrap();
        editor
            .delete(DeleteOptions::at(Point::new([1, 0], 0)))
            .unwrap();
        assert_eq!(editor.children().len(), 1);
    }
}
