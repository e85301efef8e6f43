//! # Ranges
//!
//! A [`Range`] is an anchor/focus pair of points. The anchor is where a
//! selection gesture started and the focus where it ended, so a range is
//! "backward" when the anchor comes after the focus in the document.

use crate::location::{Affinity, RangeAffinity};
use crate::operation::Operation;
use crate::path::Path;
use crate::point::Point;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub anchor: Point,
    pub focus: Point,
}

impl Range {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
        }
    }

    pub fn is_backward(&self) -> bool {
        self.anchor.is_after(&self.focus)
    }

    pub fn is_forward(&self) -> bool {
        !self.is_backward()
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn is_expanded(&self) -> bool {
        !self.is_collapsed()
    }

    /// The `(start, end)` points in document order
    pub fn edges(&self) -> (Point, Point) {
        if self.is_backward() {
            (self.focus.clone(), self.anchor.clone())
        } else {
            (self.anchor.clone(), self.focus.clone())
        }
    }

    pub fn start(&self) -> Point {
        self.edges().0
    }

    pub fn end(&self) -> Point {
        self.edges().1
    }

    pub fn includes_point(&self, point: &Point) -> bool {
        let (start, end) = self.edges();
        point.compare(&start) != Ordering::Less && point.compare(&end) != Ordering::Greater
    }

    /// True when `path` overlaps the range (ancestors of an edge count)
    pub fn includes_path(&self, path: &Path) -> bool {
        let (start, end) = self.edges();
        path.compare(&start.path) != Ordering::Less && path.compare(&end.path) != Ordering::Greater
    }

    pub fn includes_range(&self, other: &Range) -> bool {
        self.includes_point(&other.anchor) || self.includes_point(&other.focus)
    }

    /// True when `other` lies entirely inside this range
    pub fn surrounds(&self, other: &Range) -> bool {
        let (start, end) = other.edges();
        self.includes_point(&start) && self.includes_point(&end)
    }

    /// The overlap of two ranges, if they overlap
    pub fn intersection(&self, other: &Range) -> Option<Range> {
        let (s1, e1) = self.edges();
        let (s2, e2) = other.edges();
        let start = if s1.is_before(&s2) { s2 } else { s1 };
        let end = if e1.is_before(&e2) { e1 } else { e2 };
        if end.is_before(&start) {
            None
        } else {
            Some(Range::new(start, end))
        }
    }

    /// Where this range ends up after `op`, or `None` if either end is gone.
    ///
    /// `Inward` keeps text typed at either edge outside the range, `Outward`
    /// pulls it in; `Forward`/`Backward`/`None` apply to both ends alike.
    pub fn transform(&self, op: &Operation, affinity: Option<RangeAffinity>) -> Option<Range> {
        let (anchor_affinity, focus_affinity) = match affinity {
            Some(RangeAffinity::Inward) => {
                let collapsed = self.is_collapsed();
                if self.is_forward() {
                    let anchor = Affinity::Forward;
                    (Some(anchor), Some(if collapsed { anchor } else { Affinity::Backward }))
                } else {
                    let anchor = Affinity::Backward;
                    (Some(anchor), Some(if collapsed { anchor } else { Affinity::Forward }))
                }
            }
            Some(RangeAffinity::Outward) => {
                if self.is_forward() {
                    (Some(Affinity::Backward), Some(Affinity::Forward))
                } else {
                    (Some(Affinity::Forward), Some(Affinity::Backward))
                }
            }
            Some(RangeAffinity::Forward) => (Some(Affinity::Forward), Some(Affinity::Forward)),
            Some(RangeAffinity::Backward) => (Some(Affinity::Backward), Some(Affinity::Backward)),
            None => (None, None),
        };

        let anchor = self.anchor.transform(op, anchor_affinity)?;
        let focus = self.focus.transform(op, focus_affinity)?;
        Some(Range::new(anchor, focus))
    }
}
