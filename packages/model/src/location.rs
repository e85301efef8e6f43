//! Location variants and tie-break rules shared by paths, points and ranges

use crate::path::Path;
use crate::point::Point;
use crate::range::Range;
use serde::{Deserialize, Serialize};

/// Which side of an edit boundary a collapsed location sticks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Affinity {
    Forward,
    Backward,
}

/// Tie-break rule for the two ends of a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeAffinity {
    Forward,
    Backward,
    /// Both ends move away from the content: text typed at an edge is inside
    Outward,
    /// Both ends move towards the content: text typed at an edge is outside
    Inward,
}

impl From<Affinity> for RangeAffinity {
    fn from(affinity: Affinity) -> Self {
        match affinity {
            Affinity::Forward => RangeAffinity::Forward,
            Affinity::Backward => RangeAffinity::Backward,
        }
    }
}

/// Which end of a location to resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Edge {
    #[default]
    Start,
    End,
}

/// Anything a transform or query can be aimed at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Path(Path),
    Point(Point),
    Range(Range),
}

impl Location {
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Location::Path(path) => Some(path),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<&Point> {
        match self {
            Location::Point(point) => Some(point),
            _ => None,
        }
    }

    pub fn as_range(&self) -> Option<&Range> {
        match self {
            Location::Range(range) => Some(range),
            _ => None,
        }
    }
}

impl From<Path> for Location {
    fn from(path: Path) -> Self {
        Location::Path(path)
    }
}

impl From<Point> for Location {
    fn from(point: Point) -> Self {
        Location::Point(point)
    }
}

impl From<Range> for Location {
    fn from(range: Range) -> Self {
        Location::Range(range)
    }
}

/// A pair of paths bounding a document-order walk
///
/// Unlike a [`Range`], neither end has to resolve to a text leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub from: Path,
    pub to: Path,
}

impl Span {
    pub fn new(from: impl Into<Path>, to: impl Into<Path>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}
