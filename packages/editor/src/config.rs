//! Editor configuration

use quire_model::{Element, Properties, Text};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default multiplier for the normalization iteration cap
pub const DEFAULT_ITERATION_FACTOR: usize = 42;

/// Default number of operations the editor keeps in its log
pub const DEFAULT_OPERATION_LOG_LIMIT: usize = 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// A normalization pass gives up after `dirty paths × factor` fixes
    pub iteration_factor: usize,

    /// Properties of the block inserted when the document has no children
    pub default_block: Properties,

    /// Most recent operations kept in the drainable log (0 = unlimited)
    pub operation_log_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let mut default_block = Properties::new();
        default_block.insert("type".to_string(), Value::from("paragraph"));
        Self {
            iteration_factor: DEFAULT_ITERATION_FACTOR,
            default_block,
            operation_log_limit: DEFAULT_OPERATION_LOG_LIMIT,
        }
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_iteration_factor(mut self, factor: usize) -> Self {
        self.iteration_factor = factor.max(1);
        self
    }

    pub fn with_default_block(mut self, properties: Properties) -> Self {
        self.default_block = properties;
        self
    }

    pub fn with_operation_log_limit(mut self, limit: usize) -> Self {
        self.operation_log_limit = limit;
        self
    }

    /// An empty default block, ready to insert
    pub fn empty_block(&self) -> Element {
        Element {
            children: vec![Text::new("").into()],
            properties: self.default_block.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.iteration_factor, 42);
        assert_eq!(config.operation_log_limit, DEFAULT_OPERATION_LOG_LIMIT);
        assert_eq!(config.empty_block().kind(), Some("paragraph"));
        assert_eq!(config.empty_block().children.len(), 1);
    }

    #[test]
    fn test_builders() {
        let mut heading = Properties::new();
        heading.insert("type".to_string(), json!("heading"));
        let config = EditorConfig::new()
            .with_iteration_factor(0)
            .with_default_block(heading)
            .with_operation_log_limit(8);
        assert_eq!(config.iteration_factor, 1);
        assert_eq!(config.operation_log_limit, 8);
        assert_eq!(config.empty_block().kind(), Some("heading"));
    }

    #[test]
    fn test_deserialize_fills_missing_fields() {
        let config: EditorConfig = serde_json::from_value(json!({ "iterationFactor": 7 })).unwrap();
        assert_eq!(config.iteration_factor, 7);
        assert_eq!(config.empty_block().kind(), Some("paragraph"));

        let round = serde_json::to_value(&config).unwrap();
        assert_eq!(round["defaultBlock"]["type"], json!("paragraph"));
    }
}
