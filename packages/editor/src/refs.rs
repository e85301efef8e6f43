//! # Location references
//!
//! A ref is a location that stays correct while the document changes. The
//! editor owns every live ref; callers hold lightweight handles and read the
//! current value through the editor. After each applied operation every ref
//! is transformed, and a ref whose location no longer exists is dropped from
//! the registry. Handles are released explicitly with `unref`.

use crate::editor::Editor;
use quire_model::{Affinity, Operation, Path, Point, Range, RangeAffinity};
use std::collections::BTreeMap;

/// Handle to a tracked [`Path`]
#[derive(Debug, PartialEq, Eq)]
pub struct PathRef {
    id: u64,
}

/// Handle to a tracked [`Point`]
#[derive(Debug, PartialEq, Eq)]
pub struct PointRef {
    id: u64,
}

/// Handle to a tracked [`Range`]
#[derive(Debug, PartialEq, Eq)]
pub struct RangeRef {
    id: u64,
}

#[derive(Debug, Default)]
pub(crate) struct RefRegistry {
    next_id: u64,
    paths: BTreeMap<u64, (Path, Option<Affinity>)>,
    points: BTreeMap<u64, (Point, Option<Affinity>)>,
    ranges: BTreeMap<u64, (Range, Option<RangeAffinity>)>,
}

impl RefRegistry {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub(crate) fn track_path(&mut self, path: Path, affinity: Option<Affinity>) -> PathRef {
        let id = self.allocate();
        self.paths.insert(id, (path, affinity));
        PathRef { id }
    }

    pub(crate) fn track_point(&mut self, point: Point, affinity: Option<Affinity>) -> PointRef {
        let id = self.allocate();
        self.points.insert(id, (point, affinity));
        PointRef { id }
    }

    pub(crate) fn track_range(
        &mut self,
        range: Range,
        affinity: Option<RangeAffinity>,
    ) -> RangeRef {
        let id = self.allocate();
        self.ranges.insert(id, (range, affinity));
        RangeRef { id }
    }

    /// Carries every live ref through `op`
    pub(crate) fn transform(&mut self, op: &Operation) {
        self.paths
            .retain(|_, (path, affinity)| match path.transform(op, *affinity) {
                Some(next) => {
                    *path = next;
                    true
                }
                None => false,
            });
        self.points
            .retain(|_, (point, affinity)| match point.transform(op, *affinity) {
                Some(next) => {
                    *point = next;
                    true
                }
                None => false,
            });
        self.ranges
            .retain(|_, (range, affinity)| match range.transform(op, *affinity) {
                Some(next) => {
                    *range = next;
                    true
                }
                None => false,
            });
    }

    pub(crate) fn len(&self) -> usize {
        self.paths.len() + self.points.len() + self.ranges.len()
    }
}

impl PathRef {
    pub fn current(&self, editor: &Editor) -> Option<Path> {
        editor.refs.paths.get(&self.id).map(|(path, _)| path.clone())
    }

    /// Overrides the tracked path, keeping the ref's affinity
    pub(crate) fn set(&self, editor: &mut Editor, path: Path) {
        if let Some((current, _)) = editor.refs.paths.get_mut(&self.id) {
            *current = path;
        }
    }

    /// Stops tracking and returns the final location
    pub fn unref(self, editor: &mut Editor) -> Option<Path> {
        editor.refs.paths.remove(&self.id).map(|(path, _)| path)
    }
}

impl PointRef {
    pub fn current(&self, editor: &Editor) -> Option<Point> {
        editor.refs.points.get(&self.id).map(|(point, _)| point.clone())
    }

    pub fn unref(self, editor: &mut Editor) -> Option<Point> {
        editor.refs.points.remove(&self.id).map(|(point, _)| point)
    }
}

impl RangeRef {
    pub fn current(&self, editor: &Editor) -> Option<Range> {
        editor.refs.ranges.get(&self.id).map(|(range, _)| range.clone())
    }

    pub fn unref(self, editor: &mut Editor) -> Option<Range> {
        editor.refs.ranges.remove(&self.id).map(|(range, _)| range)
    }
}

impl Editor {
    pub fn path_ref(&mut self, path: Path, affinity: Option<Affinity>) -> PathRef {
        self.refs.track_path(path, affinity)
    }

    pub fn point_ref(&mut self, point: Point, affinity: Option<Affinity>) -> PointRef {
        self.refs.track_point(point, affinity)
    }

    pub fn range_ref(&mut self, range: Range, affinity: Option<RangeAffinity>) -> RangeRef {
        self.refs.track_range(range, affinity)
    }

    /// Number of refs still being tracked
    pub fn live_refs(&self) -> usize {
        self.refs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_model::{Node, Text};

    #[test]
    fn test_registry_drops_removed_locations() {
        let mut registry = RefRegistry::default();
        let kept = registry.track_path([2].into(), Some(Affinity::Forward));
        let removed = registry.track_point(Point::new([0, 0], 1), Some(Affinity::Forward));
        assert_eq!(registry.len(), 2);

        registry.transform(&Operation::RemoveNode {
            path: [0].into(),
            node: Node::Text(Text::new("")),
        });

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.paths.get(&kept.id).map(|(p, _)| p.clone()), Some([1].into()));
        assert!(!registry.points.contains_key(&removed.id));
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut registry = RefRegistry::default();
        let first = registry.track_path([0].into(), None);
        let second = registry.track_path([0].into(), None);
        assert_ne!(first, second);
    }
}
