//! # Transforms
//!
//! High-level edits built from primitive operations. A transform resolves
//! its target location (falling back to the selection), plans the
//! operations, and applies them with normalization suspended so the
//! document is repaired once, after the whole edit.
//!
//! ```text
//! caller ──► transform ──► resolve `at` ──► apply op ──► apply op ──► normalize
//!                                             │            │
//!                                             └─ refs ◄────┘
//! ```

mod node;
mod selection;
mod text;

pub use selection::{MoveOptions, SelectionEdge};
pub use text::{DeleteOptions, TextOptions};

use crate::editor::Editor;
use crate::queries::Mode;
use quire_model::{Location, Matcher};

/// Options shared by the node transforms
///
/// Fields only some transforms read are noted on the field.
#[derive(Debug, Clone)]
pub struct NodeOptions {
    /// Target location; the selection when missing
    pub at: Option<Location>,
    /// Which nodes the transform acts on. The default depends on the
    /// transform, usually the node at a path target or the blocks in a range.
    pub matcher: Option<Matcher>,
    pub mode: Mode,
    /// Keep a range that ends at offset 0 of the next block as it is
    pub hanging: bool,
    /// Treat void elements as valid targets
    pub voids: bool,
    /// `set_nodes`, `wrap_nodes`, `unwrap_nodes`: split at the range edges
    /// first so only the covered part is affected
    pub split: bool,
    /// `insert_nodes`: select the end of the inserted nodes. Defaults to
    /// true when `at` is missing.
    pub select: Option<bool>,
    /// `split_nodes`: split even at the edge of a node
    pub always: bool,
    /// `split_nodes`: number of levels above the leaf to leave unsplit
    pub height: usize,
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self {
            at: None,
            matcher: None,
            mode: Mode::Lowest,
            hanging: false,
            voids: false,
            split: false,
            select: None,
            always: false,
            height: 0,
        }
    }
}

impl NodeOptions {
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

    pub fn hanging(mut self) -> Self {
        self.hanging = true;
        self
    }

    pub fn voids(mut self) -> Self {
        self.voids = true;
        self
    }

    pub fn split(mut self) -> Self {
        self.split = true;
        self
    }

    pub fn select(mut self, select: bool) -> Self {
        self.select = Some(select);
        self
    }

    pub fn always(mut self) -> Self {
        self.always = true;
        self
    }

    pub fn height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }
}

impl Editor {
    /// The node at a path target, or every block of a point or range target
    pub(crate) fn default_matcher(&self, at: &Location) -> Matcher {
        match at {
            Location::Path(path) => Matcher::at(path.clone()),
            _ => Matcher::Block,
        }
    }
}
