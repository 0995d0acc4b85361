//! Planar and spatial geometry helpers shared by the path graph and the
//! placement engine.
//!
//! The floor plane is X/Z; Y is height. Everything here is a plain value type
//! so snapshots and undo history can copy freely.

use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;

/// Tolerance under which two path vertices are considered the same vertex.
pub const VERTEX_EPSILON: f64 = 0.1;

/// Spacing of the aisle drawing grid.
pub const HALF_GRID: f64 = 0.5;

/// A point on the floor plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub z: f64,
}

impl Point2D {
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// True when both axes differ by less than `tolerance`.
    ///
    /// This is a per-axis box test, not a radius test: vertex identity in the
    /// path graph has always been checked this way.
    pub fn approx_eq(&self, other: &Point2D, tolerance: f64) -> bool {
        (self.x - other.x).abs() < tolerance && (self.z - other.z).abs() < tolerance
    }

    /// Vertex identity with the default [`VERTEX_EPSILON`].
    pub fn same_vertex(&self, other: &Point2D) -> bool {
        self.approx_eq(other, VERTEX_EPSILON)
    }

    /// Snaps both coordinates to the nearest half-unit grid intersection.
    pub fn snap_to_half_grid(&self) -> Point2D {
        Point2D::new(snap_to_grid(self.x, HALF_GRID), snap_to_grid(self.z, HALF_GRID))
    }

    pub fn offset(&self, dx: f64, dz: f64) -> Point2D {
        Point2D::new(self.x + dx, self.z + dz)
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.z)
    }
}

/// A point in world space. `y` is the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Projection onto the floor plane.
    pub fn ground(&self) -> Point2D {
        Point2D::new(self.x, self.z)
    }

    pub fn distance_to(&self, other: &Vec3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn with_y(&self, y: f64) -> Vec3 {
        Vec3::new(self.x, y, self.z)
    }
}

/// Rounds `value` to the nearest multiple of `step`, ties rounding up.
///
/// Ties go towards positive infinity so that `-0.25` on a half grid lands on
/// `0.0` rather than `-0.5`.
pub fn snap_to_grid(value: f64, step: f64) -> f64 {
    (value / step + 0.5).floor() * step
}

/// Wraps an angle in radians into `[0, 2π)`.
pub fn wrap_angle(theta: f64) -> f64 {
    let wrapped = theta % TAU;
    if wrapped < 0.0 {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Expresses `point` in the frame of an object centred at `origin` and rotated
/// by `rotation` radians about the vertical axis.
///
/// Yaw follows the right-handed Y-up convention: a positive yaw turns +X
/// towards -Z. Seen in the (x, z) plane that is a clockwise turn, so undoing it
/// is a counter-clockwise `Rotation2` by the same angle.
pub fn to_local_frame(point: Point2D, origin: Point2D, rotation: f64) -> Point2D {
    let rel = Vector2::new(point.x - origin.x, point.z - origin.z);
    let local = Rotation2::new(rotation) * rel;
    Point2D::new(local.x, local.y)
}

/// Extent along X and Z of a `width` x `depth` rectangle rotated by `rotation`.
pub fn rotated_extent(width: f64, depth: f64, rotation: f64) -> (f64, f64) {
    let cos = rotation.cos().abs();
    let sin = rotation.sin().abs();
    (width * cos + depth * sin, width * sin + depth * cos)
}

/// Axis-aligned rectangle on the floor plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2D {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Bounds2D {
    pub fn new(min_x: f64, max_x: f64, min_z: f64, max_z: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    pub fn from_center(center: Point2D, width: f64, depth: f64) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.x + width / 2.0,
            center.z - depth / 2.0,
            center.z + depth / 2.0,
        )
    }

    /// Axis-aligned bounds of a rotated rectangle.
    pub fn rotated(center: Point2D, width: f64, depth: f64, rotation: f64) -> Self {
        let (w, d) = rotated_extent(width, depth, rotation);
        Self::from_center(center, w, d)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f64 {
        self.max_z - self.min_z
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_z + self.max_z) / 2.0,
        )
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point2D) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.z >= self.min_z && p.z <= self.max_z
    }

    pub fn overlaps(&self, other: &Bounds2D) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_z < other.max_z
            && self.max_z > other.min_z
    }
}

/// Shrunken footprint overlap used for stacking.
///
/// Two footprints overlap when their centre distance on each axis is below
/// `shrink` times the sum of their half extents. A shrink below 1 stops boxes
/// that merely touch at a corner from counting as stacked.
pub fn footprints_overlap(
    a: Point2D,
    a_half: (f64, f64),
    b: Point2D,
    b_half: (f64, f64),
    shrink: f64,
) -> bool {
    let overlap_x = (a.x - b.x).abs() < (a_half.0 + b_half.0) * shrink;
    let overlap_z = (a.z - b.z).abs() < (a_half.1 + b_half.1) * shrink;
    overlap_x && overlap_z
}
