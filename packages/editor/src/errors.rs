//! Error types for the editor

use quire_model::{LocationError, OperationError};
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    #[error("Invalid operation: {0}")]
    InvalidOperation(#[from] OperationError),

    #[error("Could not completely normalize the document after {iterations} iterations")]
    SchemaViolation { iterations: usize },

    #[error("No location was given and the editor has no selection")]
    NoSelection,

    #[error("Rule '{rule}' reported violation '{code}' without a fix for it")]
    UnhandledViolation { rule: String, code: String },

    #[error("Invalid transform: {0}")]
    InvalidTransform(String),
}

impl EditorError {
    pub fn invalid_transform(message: impl Into<String>) -> Self {
        Self::InvalidTransform(message.into())
    }

    /// True when the document may be left in a state that breaks its
    /// invariants and should not be edited further without a reset
    pub fn is_fatal(&self) -> bool {
        matches!(self, EditorError::SchemaViolation { .. })
    }
}
