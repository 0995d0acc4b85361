//! Path graph type definitions: Path, DrawingStart, PathGraphState, PointHit,
//! ClickOutcome, DrawHint.

use depotkit_core::Point2D;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered polyline on the floor plane.
///
/// Stored paths always hold at least two points; adjacent points never
/// coincide within [`depotkit_core::VERTEX_EPSILON`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<Point2D>);

impl Path {
    pub fn new(points: Vec<Point2D>) -> Self {
        Self(points)
    }

    /// Two-point path from `start` to `end`.
    pub fn segment(start: Point2D, end: Point2D) -> Self {
        Self(vec![start, end])
    }

    pub fn points(&self) -> &[Point2D] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<Point2D> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<Point2D> {
        self.0.last().copied()
    }

    pub fn push(&mut self, point: Point2D) {
        self.0.push(point);
    }

    pub fn prepend(&mut self, point: Point2D) {
        self.0.insert(0, point);
    }

    pub fn remove(&mut self, index: usize) -> Point2D {
        self.0.remove(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point2D> {
        self.0.iter()
    }

    /// Consecutive point pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }

    /// Total polyline length.
    pub fn length(&self) -> f64 {
        self.segments().map(|(a, b)| a.distance_to(&b)).sum()
    }

    /// True when both paths have the same vertex sequence within `tolerance`.
    pub fn approx_eq(&self, other: &Path, tolerance: f64) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.approx_eq(b, tolerance))
    }

    pub fn into_points(self) -> Vec<Point2D> {
        self.0
    }
}

impl From<Vec<Point2D>> for Path {
    fn from(points: Vec<Point2D>) -> Self {
        Self(points)
    }
}

/// Anchor of the segment currently being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawingStart {
    pub point: Point2D,
    /// Whether the anchor was adopted from an existing vertex.
    pub from_existing: bool,
}

impl DrawingStart {
    pub fn new(point: Point2D, from_existing: bool) -> Self {
        Self {
            point,
            from_existing,
        }
    }
}

/// Value snapshot of the path graph, used by undo/redo.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathGraphState {
    pub paths: Vec<Path>,
    pub drawing_start: Option<DrawingStart>,
}

/// A vertex located by a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointHit {
    pub path_index: usize,
    pub point_index: usize,
    pub point: Point2D,
    pub distance: f64,
}

/// User-facing reason an interaction did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawHint {
    /// The end click resolved to the start point.
    SameStartAndEnd,
    /// No vertex lies close enough to delete.
    NothingToDelete,
    /// There are no paths to clear.
    NothingToClear,
    /// History is at its floor.
    NothingToUndo,
    /// The redo stack is empty.
    NothingToRedo,
}

impl fmt::Display for DrawHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SameStartAndEnd => write!(f, "Start and end point cannot be the same"),
            Self::NothingToDelete => write!(f, "No point near the cursor to delete"),
            Self::NothingToClear => write!(f, "There are no paths to clear"),
            Self::NothingToUndo => write!(f, "Nothing to undo"),
            Self::NothingToRedo => write!(f, "Nothing to redo"),
        }
    }
}

/// Result of a left click while drawing aisles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// A new drawing anchor was set.
    Started(DrawingStart),
    /// A segment was added; drawing continues from `end`.
    Committed { start: Point2D, end: Point2D },
    /// Nothing changed.
    Rejected(DrawHint),
}

impl ClickOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}
