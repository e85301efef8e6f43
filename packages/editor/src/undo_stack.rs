//! # Undo/Redo Stack
//!
//! Records the operations of each edit and replays them backwards or forwards.
//!
//! ## Design
//!
//! - An edit runs inside [`UndoStack::transact`], which captures every
//!   operation it applied, normalization fixes included
//! - Undo applies the inverses in reverse order with normalization suspended
//! - Redo reapplies the original operations
//! - New edits clear the redo stack
//! - Explicit batches group several transactions into one undo step
//! - Edits that only move the selection are not recorded
//!
//! ## Example
//!
//! ```rust
//! use quire_editor::{Editor, TextOptions, UndoStack};
//! use quire_model::{Document, Element, Path, Point, Text};
//!
//! let mut editor = Editor::new(Document::new(vec![
//!     Element::of_type("paragraph").with_child(Text::new("word")).into(),
//! ]));
//! let mut history = UndoStack::new();
//!
//! history
//!     .transact(&mut editor, |editor| {
//!         editor.insert_text("s", TextOptions::at(Point::new([0, 0], 4)))
//!     })
//!     .unwrap();
//! assert_eq!(editor.string(Path::from([0]), false).unwrap(), "words");
//!
//! history.undo(&mut editor).unwrap();
//! assert_eq!(editor.string(Path::from([0]), false).unwrap(), "word");
//!
//! history.redo(&mut editor).unwrap();
//! assert_eq!(editor.string(Path::from([0]), false).unwrap(), "words");
//! ```

use crate::editor::Editor;
use crate::errors::EditorResult;
use quire_model::{Operation, Range};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default number of undo levels kept
pub const DEFAULT_MAX_LEVELS: usize = 100;

/// A group of operations that are undone/redone together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationBatch {
    /// The operations in this batch (in application order)
    pub operations: Vec<Operation>,

    /// The inverse operations (in reverse order for undo)
    pub inverses: Vec<Operation>,

    /// Optional description of this batch
    pub description: Option<String>,

    /// Selection before the first operation ran
    pub selection_before: Option<Range>,

    /// Selection after the last operation ran
    pub selection_after: Option<Range>,
}

impl OperationBatch {
    fn empty(selection_before: Option<Range>) -> Self {
        Self {
            operations: Vec::new(),
            inverses: Vec::new(),
            description: None,
            selection_after: selection_before.clone(),
            selection_before,
        }
    }

    /// Create a batch from operations in application order
    pub fn from_operations(
        operations: Vec<Operation>,
        selection_before: Option<Range>,
        selection_after: Option<Range>,
    ) -> Self {
        let mut batch = Self::empty(selection_before);
        batch.extend(operations, selection_after);
        batch
    }

    /// Add a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn extend(&mut self, operations: Vec<Operation>, selection_after: Option<Range>) {
        // Inverses go in reverse order
        let inverses: Vec<Operation> = operations.iter().rev().map(Operation::inverse).collect();
        self.inverses.splice(0..0, inverses);
        self.operations.extend(operations);
        self.selection_after = selection_after;
    }

    /// True when no operation in the batch touches the tree
    pub fn is_selection_only(&self) -> bool {
        self.operations.iter().all(Operation::is_selection_operation)
    }
}

/// Undo/redo history for an [`Editor`]
#[derive(Debug)]
pub struct UndoStack {
    /// Stack of applied batches (most recent last)
    undo_stack: Vec<OperationBatch>,

    /// Stack of undone batches (most recent last)
    redo_stack: Vec<OperationBatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Currently building a batch
    current_batch: Option<OperationBatch>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_MAX_LEVELS)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Runs `f` against `editor` and records the operations it applied.
    ///
    /// When `f` fails, the operations it managed to apply are rolled back
    /// and nothing is recorded.
    pub fn transact<T, F>(&mut self, editor: &mut Editor, f: F) -> EditorResult<T>
    where
        F: FnOnce(&mut Editor) -> EditorResult<T>,
    {
        let selection_before = editor.selection().cloned();
        let (result, applied) = editor.capture(f);

        match result {
            Ok(value) => {
                self.record(applied, selection_before, editor.selection().cloned());
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = rollback(editor, &applied, selection_before) {
                    warn!(error = %rollback, "failed to roll back a failed edit");
                }
                Err(err)
            }
        }
    }

    /// Records operations the caller already applied
    pub fn record(
        &mut self,
        operations: Vec<Operation>,
        selection_before: Option<Range>,
        selection_after: Option<Range>,
    ) {
        if operations.is_empty() {
            return;
        }

        if let Some(batch) = &mut self.current_batch {
            // Add to current batch
            batch.extend(operations, selection_after);
        } else {
            let batch = OperationBatch::from_operations(operations, selection_before, selection_after);
            if !batch.is_selection_only() {
                self.push_batch(batch);
            }
        }
    }

    /// Start a batch (every transaction until `end_batch` is one undo step)
    pub fn begin_batch(&mut self, editor: &Editor) {
        self.current_batch = Some(OperationBatch::empty(editor.selection().cloned()));
    }

    /// End the current batch and push to undo stack
    pub fn end_batch(&mut self) {
        if let Some(batch) = self.current_batch.take() {
            if !batch.operations.is_empty() && !batch.is_selection_only() {
                self.push_batch(batch);
            }
        }
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    /// Push a batch to the undo stack
    fn push_batch(&mut self, batch: OperationBatch) {
        self.undo_stack.push(batch);

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // New work invalidates what was undone
        self.redo_stack.clear();
    }

    /// Undo the most recent batch. Returns false when there was nothing to undo.
    pub fn undo(&mut self, editor: &mut Editor) -> EditorResult<bool> {
        let Some(batch) = self.undo_stack.pop() else {
            return Ok(false);
        };
        debug!(
            operations = batch.inverses.len(),
            description = batch.description.as_deref(),
            "undo"
        );

        editor.without_normalizing(|editor| {
            for inverse in &batch.inverses {
                editor.apply(inverse.clone())?;
            }
            restore_selection(editor, batch.selection_before.clone())
        })?;

        self.redo_stack.push(batch);
        Ok(true)
    }

    /// Redo the most recently undone batch. Returns false when there was
    /// nothing to redo.
    pub fn redo(&mut self, editor: &mut Editor) -> EditorResult<bool> {
        let Some(batch) = self.redo_stack.pop() else {
            return Ok(false);
        };
        debug!(
            operations = batch.operations.len(),
            description = batch.description.as_deref(),
            "redo"
        );

        editor.without_normalizing(|editor| {
            for op in &batch.operations {
                editor.apply(op.clone())?;
            }
            restore_selection(editor, batch.selection_after.clone())
        })?;

        // Don't clear redo stack
        self.undo_stack.push(batch);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Description of the batch that `undo` would revert
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last()?.description.as_deref()
    }

    /// Description of the batch that `redo` would reapply
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last()?.description.as_deref()
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

fn rollback(editor: &mut Editor, applied: &[Operation], selection: Option<Range>) -> EditorResult<()> {
    editor.without_normalizing(|editor| {
        for op in applied.iter().rev() {
            editor.apply(op.inverse())?;
        }
        restore_selection(editor, selection)
    })
}

fn restore_selection(editor: &mut Editor, selection: Option<Range>) -> EditorResult<()> {
    if editor.selection() == selection.as_ref() {
        return Ok(());
    }
    match selection {
        Some(range) => editor.select(range),
        None => editor.deselect(),
    }
}
