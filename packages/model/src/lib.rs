//! # Quire Model
//!
//! The document model underneath the quire editor: locations, the node tree
//! and the operation algebra.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ location: Path / Point / Range / Span       │
//! │  - document-order comparison                │
//! │  - transform through any operation          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ node tree: Document → Element → Text        │
//! │  - value-typed, no parent pointers          │
//! │  - queries derived from paths               │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ operations: apply / inverse                 │
//! │  - nine primitive, invertible edits         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use quire_model::{Document, Element, Operation, Text};
//!
//! let mut doc = Document::new(vec![
//!     Element::of_type("paragraph").with_child(Text::new("word")).into(),
//! ]);
//! let op = Operation::InsertText {
//!     path: [0, 0].into(),
//!     offset: 2,
//!     text: "X".into(),
//! };
//! doc.apply(&op).unwrap();
//! assert_eq!(doc.leaf(&[0, 0].into()).unwrap().text, "woXrd");
//!
//! doc.apply(&op.inverse()).unwrap();
//! assert_eq!(doc.leaf(&[0, 0].into()).unwrap().text, "word");
//! ```

mod apply;
mod error;
mod location;
mod matcher;
mod node;
mod operation;
mod path;
mod point;
mod query;
mod range;

pub use error::{LocationError, LocationResult, OperationError, OperationResult};
pub use location::{Affinity, Edge, Location, RangeAffinity, Span};
pub use matcher::{DefaultSchema, Matcher, Predicate, Schema};
pub use node::{
    byte_offset, Document, Element, Node, NodeRef, Properties, Text, INLINE_KEY, RESERVED_KEYS,
    VOID_KEY,
};
pub use operation::{Operation, SelectionDiff};
pub use path::Path;
pub use point::Point;
pub use query::{Entry, Walk};
pub use range::Range;
