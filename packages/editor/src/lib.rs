//! # Quire Editor
//!
//! Editing engine for quire documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: locations, node tree, operations     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Editor instance                     │
//! │  - Apply operations, keep the op log        │
//! │  - Track refs across every operation        │
//! │  - Normalize dirty paths after edits        │
//! │  - Queries and high-level transforms        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ undo stack: invert and replay op batches    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Operations are the only way to change a document**: transforms,
//!    normalization and undo all go through [`Editor::apply`]
//! 2. **Every operation has an exact inverse**
//! 3. **Locations are paths, not identities**: refs keep them current
//! 4. **Normalization always terminates**: the pass is capped and reports
//!    [`EditorError::SchemaViolation`] instead of looping
//!
//! ## Usage
//!
//! ```rust
//! use quire_editor::{Editor, NodeOptions, TextOptions};
//! use quire_model::{Document, Element, Path, Point, Text};
//!
//! let mut editor = Editor::new(Document::new(vec![
//!     Element::of_type("paragraph").with_child(Text::new("hello")).into(),
//! ]));
//! editor.normalize().unwrap();
//!
//! editor.select(Point::new([0, 0], 5)).unwrap();
//! editor.insert_text(" world", TextOptions::default()).unwrap();
//! editor.split_nodes(NodeOptions::default().always()).unwrap();
//!
//! assert_eq!(editor.children().len(), 2);
//! assert_eq!(editor.string(Path::from([0]), false).unwrap(), "hello world");
//! assert_eq!(editor.selection().unwrap().anchor, Point::new([1, 0], 0));
//! ```

mod config;
mod editor;
mod errors;
mod normalize;
mod queries;
mod refs;
mod transforms;
mod undo_stack;

pub use config::{EditorConfig, DEFAULT_ITERATION_FACTOR, DEFAULT_OPERATION_LOG_LIMIT};
pub use editor::Editor;
pub use errors::{EditorError, EditorResult};
pub use normalize::{CoreRules, NormalizeRule, RuleRegistry, Violation};
pub use queries::{
    AboveOptions, At, Distance, LevelsOptions, Mode, NodesOptions, PositionsOptions, Unit,
};
pub use refs::{PathRef, PointRef, RangeRef};
pub use transforms::{
    DeleteOptions, MoveOptions, NodeOptions, SelectionEdge, TextOptions,
};
pub use undo_stack::{OperationBatch, UndoStack, DEFAULT_MAX_LEVELS};

// Re-export the model for convenience
pub use quire_model;
