//! Selection transforms

use crate::editor::Editor;
use crate::errors::{EditorError, EditorResult};
use crate::queries::{Distance, Unit};
use quire_model::{Location, Operation, Point, Range, SelectionDiff};

/// One end of the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEdge {
    Anchor,
    Focus,
    /// Whichever end comes first in the document
    Start,
    /// Whichever end comes last in the document
    End,
}

impl SelectionEdge {
    /// Anchor or focus, depending on the direction of `selection`
    fn resolve(self, selection: &Range) -> SelectionEdge {
        match self {
            SelectionEdge::Start if selection.is_backward() => SelectionEdge::Focus,
            SelectionEdge::Start => SelectionEdge::Anchor,
            SelectionEdge::End if selection.is_backward() => SelectionEdge::Anchor,
            SelectionEdge::End => SelectionEdge::Focus,
            edge => edge,
        }
    }
}

/// Cursor motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOptions {
    pub distance: usize,
    pub unit: Unit,
    pub reverse: bool,
    /// Move only this end; both ends move when `None`
    pub edge: Option<SelectionEdge>,
}

impl Default for MoveOptions {
    fn default() -> Self {
        Self {
            distance: 1,
            unit: Unit::Character,
            reverse: false,
            edge: None,
        }
    }
}

impl Editor {
    /// Selects `target`, which is resolved to a range first
    pub fn select(&mut self, target: impl Into<Location>) -> EditorResult<()> {
        let target = self.range(target)?;
        match self.selection() {
            Some(_) => self.set_selection(target.into()),
            None => self.apply(Operation::SetSelection {
                properties: None,
                new_properties: Some(target.into()),
            }),
        }
    }

    /// Clears the selection; nothing happens when there is none
    pub fn deselect(&mut self) -> EditorResult<()> {
        let Some(selection) = self.selection().cloned() else {
            return Ok(());
        };
        self.apply(Operation::SetSelection {
            properties: Some(selection.into()),
            new_properties: None,
        })
    }

    /// Collapses the selection onto one of its ends
    pub fn collapse(&mut self, edge: SelectionEdge) -> EditorResult<()> {
        let selection = self.selection().cloned().ok_or(EditorError::NoSelection)?;
        let point = match edge {
            SelectionEdge::Anchor => selection.anchor,
            SelectionEdge::Focus => selection.focus,
            SelectionEdge::Start => selection.start(),
            SelectionEdge::End => selection.end(),
        };
        self.select(point)
    }

    /// Changes the given ends of the selection, emitting only what differs
    pub fn set_selection(&mut self, diff: SelectionDiff) -> EditorResult<()> {
        let selection = self.selection().cloned().ok_or(EditorError::NoSelection)?;
        let mut old = SelectionDiff::default();
        let mut new = SelectionDiff::default();

        if let Some(anchor) = diff.anchor.filter(|anchor| *anchor != selection.anchor) {
            old.anchor = Some(selection.anchor.clone());
            new.anchor = Some(anchor);
        }
        if let Some(focus) = diff.focus.filter(|focus| *focus != selection.focus) {
            old.focus = Some(selection.focus.clone());
            new.focus = Some(focus);
        }

        if new.is_empty() {
            return Ok(());
        }
        self.apply(Operation::SetSelection {
            properties: Some(old),
            new_properties: Some(new),
        })
    }

    /// Moves one end of the selection to `point`
    pub fn set_point(&mut self, point: Point, edge: SelectionEdge) -> EditorResult<()> {
        let selection = self.selection().cloned().ok_or(EditorError::NoSelection)?;
        let diff = match edge.resolve(&selection) {
            SelectionEdge::Anchor => SelectionDiff {
                anchor: Some(point),
                focus: None,
            },
            _ => SelectionDiff {
                anchor: None,
                focus: Some(point),
            },
        };
        self.set_selection(diff)
    }

    /// Moves the selection by `distance` units. An end that cannot move any
    /// further stays where it is.
    pub fn move_selection(&mut self, options: MoveOptions) -> EditorResult<()> {
        let selection = self.selection().cloned().ok_or(EditorError::NoSelection)?;
        let edge = options.edge.map(|edge| edge.resolve(&selection));
        let distance = Distance::new(options.distance, options.unit);
        let step = |editor: &Editor, point: &Point| {
            if options.reverse {
                editor.before(point.clone(), distance)
            } else {
                editor.after(point.clone(), distance)
            }
        };

        let mut diff = SelectionDiff::default();
        if matches!(edge, None | Some(SelectionEdge::Anchor)) {
            diff.anchor = step(self, &selection.anchor)?;
        }
        if matches!(edge, None | Some(SelectionEdge::Focus)) {
            diff.focus = step(self, &selection.focus)?;
        }
        self.set_selection(diff)
    }
}
