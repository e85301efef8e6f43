//! # Normalization
//!
//! The engine that repairs tree invariants after edits. It has two states:
//! normalizing, where every applied operation is followed by a repair pass,
//! and suspended, where operations pile up dirty paths until the outermost
//! [`Editor::without_normalizing`] call returns.
//!
//! A pass pops dirty paths most-recent-first (children before parents), asks
//! the rules about each node that still exists and applies one fix per
//! violation. Fixes mark their own dirty paths, so the pass runs until
//! nothing is left. The number of iterations is capped at
//! `dirty paths × iteration factor`; hitting the cap means some rule keeps
//! undoing another and is reported as [`EditorError::SchemaViolation`].

mod dirty;
mod rules;

pub(crate) use dirty::DirtyPaths;
pub use rules::{CoreRules, NormalizeRule, RuleRegistry, Violation};

use crate::editor::Editor;
use crate::errors::{EditorError, EditorResult};
use quire_model::{NodeRef, Path, Walk};
use tracing::{debug, error, instrument, trace};

impl Editor {
    pub fn is_normalizing(&self) -> bool {
        self.normalizing
    }

    /// Runs `f` with normalization suspended, then normalizes once.
    ///
    /// Calls nest; only the outermost one triggers the pass. If `f` fails the
    /// previous state is restored and the error is returned without a pass.
    pub fn without_normalizing<T, F>(&mut self, f: F) -> EditorResult<T>
    where
        F: FnOnce(&mut Editor) -> EditorResult<T>,
    {
        let was_normalizing = self.normalizing;
        self.normalizing = false;
        let result = f(self);
        self.normalizing = was_normalizing;
        let value = result?;
        self.normalize()?;
        Ok(value)
    }

    /// Repairs every dirty node
    pub fn normalize(&mut self) -> EditorResult<()> {
        self.normalize_with(false)
    }

    /// Like [`Editor::normalize`]; `force` marks every node dirty first
    #[instrument(level = "debug", skip(self), fields(dirty = self.dirty.len()))]
    pub fn normalize_with(&mut self, force: bool) -> EditorResult<()> {
        if !self.normalizing {
            return Ok(());
        }
        if force {
            self.mark_all_dirty();
        }
        if self.dirty.is_empty() {
            return Ok(());
        }

        self.normalizing = false;
        let result = self.run_pass();
        self.normalizing = true;
        result
    }

    fn run_pass(&mut self) -> EditorResult<()> {
        // childless elements are fixed before anything else
        for path in self.dirty.snapshot() {
            let empty = matches!(
                self.document.node(&path),
                Ok(NodeRef::Element(element)) if element.children.is_empty()
            );
            if empty {
                self.normalize_node(&path)?;
            }
        }

        let max = self.dirty.len().max(1) * self.config.iteration_factor;
        let mut iterations = 0;
        while !self.dirty.is_empty() {
            // the queue is left untouched when the cap trips
            if iterations > max {
                error!(iterations, max, dirty = self.dirty.len(), "normalization did not settle");
                return Err(EditorError::SchemaViolation { iterations });
            }
            let Some(path) = self.dirty.pop() else {
                break;
            };
            if self.document.has(&path) {
                self.normalize_node(&path)?;
            }
            iterations += 1;
        }

        debug!(iterations, "normalization settled");
        Ok(())
    }

    /// Asks each rule about the node at `path` and fixes the first violation
    fn normalize_node(&mut self, path: &Path) -> EditorResult<()> {
        for rule in self.rules.active() {
            let violation = {
                let node = self.document.node(path)?;
                rule.check(self, node, path)
            };
            if let Some(violation) = violation {
                trace!(rule = rule.name(), ?violation, %path, "fixing violation");
                return rule.fix(self, &violation, path);
            }
        }
        Ok(())
    }

    pub(crate) fn mark_all_dirty(&mut self) {
        let paths = self
            .document
            .nodes(&Walk::default())
            .into_iter()
            .map(|(_, path)| path)
            .collect::<Vec<_>>();
        self.dirty.replace(paths);
    }

    /// Paths waiting for the next pass
    pub fn dirty_paths(&self) -> Vec<Path> {
        self.dirty.snapshot()
    }
}
