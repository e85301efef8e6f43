//! # Editor
//!
//! An [`Editor`] owns one document together with everything that has to stay
//! in step with it: the live refs, the dirty paths waiting for
//! normalization, the normalization rules and the log of applied operations.
//!
//! The log is a bounded window for callers that forward operations
//! elsewhere; it keeps the most recent `operation_log_limit` entries. Code
//! that needs every operation of one edit, like the undo stack, opens a
//! [`Editor::capture`] scope instead, which draining the log cannot disturb.
//!
//! Every change goes through [`Editor::apply`]. Queries and transforms are
//! methods on the editor and live in their own modules.

use crate::config::EditorConfig;
use crate::errors::EditorResult;
use crate::normalize::{DirtyPaths, NormalizeRule, RuleRegistry};
use crate::refs::RefRegistry;
use quire_model::{DefaultSchema, Document, Node, Operation, Range, Schema};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

pub struct Editor {
    pub(crate) document: Document,
    pub(crate) config: EditorConfig,
    pub(crate) schema: Box<dyn Schema>,
    pub(crate) rules: RuleRegistry,
    pub(crate) refs: RefRegistry,
    pub(crate) dirty: DirtyPaths,
    pub(crate) normalizing: bool,
    operations: VecDeque<Operation>,
    captures: Vec<Vec<Operation>>,
}

impl Editor {
    /// Wraps `document`. Every node starts out dirty, so the first
    /// normalization checks the whole tree.
    pub fn new(document: Document) -> Self {
        Self::with_config(document, EditorConfig::default())
    }

    pub fn with_config(document: Document, config: EditorConfig) -> Self {
        let mut editor = Self {
            document,
            config,
            schema: Box::new(DefaultSchema),
            rules: RuleRegistry::new(),
            refs: RefRegistry::default(),
            dirty: DirtyPaths::default(),
            normalizing: true,
            operations: VecDeque::new(),
            captures: Vec::new(),
        };
        editor.mark_all_dirty();
        editor
    }

    pub fn with_schema(mut self, schema: impl Schema + 'static) -> Self {
        self.schema = Box::new(schema);
        self
    }

    pub fn with_rule(mut self, rule: impl NormalizeRule + 'static) -> Self {
        self.rules.add_rule(Rc::new(rule));
        self
    }

    pub fn with_rules(mut self, rules: RuleRegistry) -> Self {
        self.rules = rules;
        self
    }

    pub fn add_rule(&mut self, rule: Rc<dyn NormalizeRule>) {
        self.rules.add_rule(rule);
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn children(&self) -> &[Node] {
        &self.document.children
    }

    pub fn selection(&self) -> Option<&Range> {
        self.document.selection.as_ref()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn schema(&self) -> &dyn Schema {
        self.schema.as_ref()
    }

    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Applies one primitive operation.
    ///
    /// On success the operation is logged, refs and dirty paths follow it,
    /// and unless normalization is suspended a repair pass runs right away.
    /// A failed operation changes nothing.
    pub fn apply(&mut self, op: Operation) -> EditorResult<()> {
        self.document.apply(&op)?;
        self.refs.transform(&op);
        self.dirty.update(&op);
        trace!(kind = op.kind(), dirty = self.dirty.len(), "operation applied");
        if let Some(capture) = self.captures.last_mut() {
            capture.push(op.clone());
        }
        self.log(op);

        if self.normalizing {
            self.normalize()?;
        }
        Ok(())
    }

    /// Applies each operation in order, normalizing once at the end
    pub fn apply_all(&mut self, ops: impl IntoIterator<Item = Operation>) -> EditorResult<()> {
        self.without_normalizing(|editor| {
            for op in ops {
                editor.apply(op)?;
            }
            Ok(())
        })
    }

    /// Operations applied since the log was last drained, oldest first
    pub fn operations(&self) -> &VecDeque<Operation> {
        &self.operations
    }

    /// Drains the operation log
    pub fn take_operations(&mut self) -> Vec<Operation> {
        std::mem::take(&mut self.operations).into()
    }

    /// Runs `f` and hands back every operation applied while it ran,
    /// whether or not it succeeded.
    ///
    /// Scopes nest: an inner scope's operations are also seen by the
    /// enclosing one.
    pub fn capture<T, F>(&mut self, f: F) -> (EditorResult<T>, Vec<Operation>)
    where
        F: FnOnce(&mut Editor) -> EditorResult<T>,
    {
        self.captures.push(Vec::new());
        let result = f(self);
        let captured = self.captures.pop().unwrap_or_default();
        if let Some(outer) = self.captures.last_mut() {
            outer.extend(captured.iter().cloned());
        }
        (result, captured)
    }

    fn log(&mut self, op: Operation) {
        let limit = self.config.operation_log_limit;
        if limit > 0 && self.operations.len() >= limit {
            self.operations.pop_front();
        }
        self.operations.push_back(op);
    }
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("document", &self.document)
            .field("rules", &self.rules)
            .field("normalizing", &self.normalizing)
            .field("dirty", &self.dirty.len())
            .field("refs", &self.refs.len())
            .field("operations", &self.operations.len())
            .field("captures", &self.captures.len())
            .finish()
    }
}
