//! # Normalization rules
//!
//! A rule inspects one node and reports at most one [`Violation`]. The engine
//! applies exactly one fix per report and revisits the node afterwards, so a
//! rule never has to repair everything in a single go.
//!
//! Custom rules run before the built-in [`CoreRules`]. A rule that does not
//! override [`NormalizeRule::fix`] gets the built-in correction for the
//! violation it reported.

use crate::editor::Editor;
use crate::errors::{EditorError, EditorResult};
use quire_model::{Node, NodeRef, Operation, Path, Text};
use std::fmt;
use std::rc::Rc;

/// Something wrong with a node, addressed relative to the node's path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The root has no children
    EmptyRoot,
    /// An element has no children
    EmptyElement,
    /// Child `index` is a block among inlines, or an inline among blocks
    InvalidChild { index: usize },
    /// An empty text belongs at child `index`
    MissingText { index: usize },
    /// Child `index` is a text with the same properties as the text before it
    MergeableText { index: usize },
    /// Child `index` is an empty text next to another text
    EmptyText { index: usize },
    /// Reported by a custom rule, which must supply its own fix
    Custom { code: String },
}

impl Violation {
    pub fn custom(code: impl Into<String>) -> Self {
        Violation::Custom { code: code.into() }
    }

    /// Applies the built-in correction for this violation at `path`
    pub fn default_fix(&self, editor: &mut Editor, path: &Path, rule: &str) -> EditorResult<()> {
        let op = match self {
            Violation::EmptyRoot => Operation::InsertNode {
                path: path.child(0),
                node: editor.config().empty_block().into(),
            },
            Violation::EmptyElement => Operation::InsertNode {
                path: path.child(0),
                node: Text::new("").into(),
            },
            Violation::MissingText { index } => Operation::InsertNode {
                path: path.child(*index),
                node: Text::new("").into(),
            },
            Violation::InvalidChild { index } | Violation::EmptyText { index } => {
                let child = path.child(*index);
                Operation::RemoveNode {
                    node: owned(editor, &child)?,
                    path: child,
                }
            }
            Violation::MergeableText { index } => {
                let child = path.child(*index);
                let previous = child.previous()?;
                let position = editor.document().leaf(&previous)?.len();
                let properties = editor.document().leaf(&child)?.properties.clone();
                Operation::MergeNode {
                    path: child,
                    position,
                    properties,
                }
            }
            Violation::Custom { code } => {
                return Err(EditorError::UnhandledViolation {
                    rule: rule.to_string(),
                    code: code.clone(),
                })
            }
        };
        editor.apply(op)
    }
}

fn owned(editor: &Editor, path: &Path) -> EditorResult<Node> {
    let node = editor.document().node(path)?;
    node.to_node()
        .ok_or_else(|| EditorError::invalid_transform("cannot remove the root"))
}

/// A normalization rule
pub trait NormalizeRule {
    /// Unique identifier, reported with unhandled violations
    fn name(&self) -> &str;

    fn check(&self, editor: &Editor, node: NodeRef<'_>, path: &Path) -> Option<Violation>;

    fn fix(&self, editor: &mut Editor, violation: &Violation, path: &Path) -> EditorResult<()> {
        violation.default_fix(editor, path, self.name())
    }
}

/// The schema-independent invariants every document keeps
#[derive(Debug, Default, Clone, Copy)]
pub struct CoreRules;

impl NormalizeRule for CoreRules {
    fn name(&self) -> &str {
        "core"
    }

    fn check(&self, editor: &Editor, node: NodeRef<'_>, _path: &Path) -> Option<Violation> {
        let children = node.children()?;
        let schema = editor.schema();

        if children.is_empty() {
            return Some(if node.is_root() {
                Violation::EmptyRoot
            } else {
                Violation::EmptyElement
            });
        }

        let is_inline_or_text = |child: &Node| match child {
            Node::Text(_) => true,
            Node::Element(element) => schema.is_inline(element),
        };
        let should_have_inlines = match node {
            NodeRef::Element(element) => {
                schema.is_inline(element) || is_inline_or_text(&children[0])
            }
            _ => false,
        };

        for (index, child) in children.iter().enumerate() {
            let previous = index.checked_sub(1).map(|i| &children[i]);

            if is_inline_or_text(child) != should_have_inlines {
                return Some(Violation::InvalidChild { index });
            }

            match (child, previous) {
                (Node::Element(_), previous) if is_inline_or_text(child) => {
                    if !matches!(previous, Some(Node::Text(_))) {
                        return Some(Violation::MissingText { index });
                    }
                    if index == children.len() - 1 {
                        return Some(Violation::MissingText { index: index + 1 });
                    }
                }
                (Node::Text(text), Some(Node::Text(prev))) => {
                    if text.properties == prev.properties {
                        return Some(Violation::MergeableText { index });
                    }
                    if prev.is_empty() {
                        return Some(Violation::EmptyText { index: index - 1 });
                    }
                    if text.is_empty() {
                        return Some(Violation::EmptyText { index });
                    }
                }
                _ => {}
            }
        }

        None
    }
}

/// Ordered set of custom normalization rules
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<Rc<dyn NormalizeRule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule(&mut self, rule: Rc<dyn NormalizeRule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rc<dyn NormalizeRule>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Custom rules in registration order, then the core rules
    pub(crate) fn active(&self) -> Vec<Rc<dyn NormalizeRule>> {
        let mut active = self.rules.clone();
        active.push(Rc::new(CoreRules));
        active
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.rules.iter().map(|rule| rule.name()).collect();
        f.debug_struct("RuleRegistry").field("rules", &names).finish()
    }
}
