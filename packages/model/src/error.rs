//! Error types for the document model

use crate::path::Path;
use thiserror::Error;

pub type LocationResult<T> = Result<T, LocationError>;
pub type OperationResult<T> = Result<T, OperationError>;

/// A location that does not resolve against the current tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Cannot find a node at path {path}")]
    NodeNotFound { path: Path },

    #[error("Cannot get the {relation} of the root path")]
    Root { relation: &'static str },

    #[error("Cannot get the previous path of first child path {path}")]
    NoPrevious { path: Path },

    #[error("Expected a text node at path {path}")]
    NotText { path: Path },

    #[error("Expected an ancestor node at path {path}")]
    NotAncestor { path: Path },

    #[error("Offset {offset} is out of bounds for text of length {length} at {path}")]
    OffsetOutOfBounds {
        path: Path,
        offset: usize,
        length: usize,
    },
}

impl LocationError {
    pub fn not_found(path: &Path) -> Self {
        Self::NodeNotFound { path: path.clone() }
    }

    pub fn not_text(path: &Path) -> Self {
        Self::NotText { path: path.clone() }
    }

    pub fn not_ancestor(path: &Path) -> Self {
        Self::NotAncestor { path: path.clone() }
    }
}

/// An operation that cannot be applied to the current tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    #[error(transparent)]
    Location(#[from] LocationError),

    #[error("Cannot apply {kind} at the root path")]
    RootPath { kind: &'static str },

    #[error("Cannot insert a node at {path}: index is past the end of its parent")]
    IndexOutOfBounds { path: Path },

    #[error("Cannot move a path into itself: {path} -> {new_path}")]
    MoveIntoSelf { path: Path, new_path: Path },

    #[error("Cannot merge the node at {path} with its previous sibling: nodes are not the same kind")]
    MergeMismatch { path: Path },

    #[error("Cannot set the reserved property '{key}'")]
    ReservedProperty { key: String },

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
}
