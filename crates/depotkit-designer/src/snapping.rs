//! Edge-to-edge snapping for dragged shelves, parts and cargo.
//!
//! Bounds are axis-aligned; rotated objects use their rotated extents
//! (`width * |cos| + depth * |sin|` and the converse).

use crate::objects::PlacedObject;
use crate::registry::ObjectRegistry;
use depotkit_core::{Bounds2D, Point2D};

/// Candidate position after snapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    pub position: Point2D,
    pub snapped: bool,
}

impl SnapResult {
    fn unchanged(position: Point2D) -> Self {
        Self {
            position,
            snapped: false,
        }
    }
}

/// Snaps `dragged` at `candidate` so that its outer edges meet the opposite
/// edges of nearby shelves.
///
/// Applies to shelves and to cargo dragged across the floor. The offset of the
/// centre from the snapped edge is preserved. Later shelves win when several
/// are in range.
pub fn snap_to_shelf_edges(
    registry: &ObjectRegistry,
    dragged: &PlacedObject,
    candidate: Point2D,
    threshold: f64,
) -> SnapResult {
    let drag = dragged.bounds_at(candidate);
    let mut x = candidate.x;
    let mut z = candidate.z;
    let mut snapped = false;

    for shelf in registry.shelves().filter(|s| s.id != dragged.id) {
        let target = shelf.bounds();

        if (drag.min_x - target.max_x).abs() < threshold {
            x = target.max_x + (candidate.x - drag.min_x);
            snapped = true;
        } else if (drag.max_x - target.min_x).abs() < threshold {
            x = target.min_x - (drag.max_x - candidate.x);
            snapped = true;
        }

        if (drag.min_z - target.max_z).abs() < threshold {
            z = target.max_z + (candidate.z - drag.min_z);
            snapped = true;
        } else if (drag.max_z - target.min_z).abs() < threshold {
            z = target.min_z - (drag.max_z - candidate.z);
            snapped = true;
        }
    }

    if snapped {
        SnapResult {
            position: Point2D::new(x, z),
            snapped,
        }
    } else {
        SnapResult::unchanged(candidate)
    }
}

/// Snaps one axis of `drag` against `target`.
///
/// With `align_same_side` the near and far edges are also aligned to the
/// matching edge of the target, not just to the opposite one.
fn snap_axis(
    drag_min: f64,
    drag_max: f64,
    target_min: f64,
    target_max: f64,
    threshold: f64,
    align_same_side: bool,
) -> Option<f64> {
    let half = (drag_max - drag_min) / 2.0;
    if (drag_min - target_max).abs() < threshold {
        Some(target_max + half)
    } else if (drag_max - target_min).abs() < threshold {
        Some(target_min - half)
    } else if align_same_side && (drag_min - target_min).abs() < threshold {
        Some(target_min + half)
    } else if align_same_side && (drag_max - target_max).abs() < threshold {
        Some(target_max - half)
    } else {
        None
    }
}

/// Snaps a dragged part against other parts and shelves.
///
/// Against parts all four alignments are tried per axis (opposite edges, then
/// matching edges); against shelves only opposite edges. Later targets win.
pub fn snap_part(
    registry: &ObjectRegistry,
    dragged: &PlacedObject,
    candidate: Point2D,
    threshold: f64,
) -> SnapResult {
    let drag = dragged.bounds_at(candidate);
    let mut x = candidate.x;
    let mut z = candidate.z;
    let mut snapped = false;

    let mut apply = |target: Bounds2D, align_same_side: bool| {
        if let Some(sx) = snap_axis(drag.min_x, drag.max_x, target.min_x, target.max_x, threshold, align_same_side) {
            x = sx;
            snapped = true;
        }
        if let Some(sz) = snap_axis(drag.min_z, drag.max_z, target.min_z, target.max_z, threshold, align_same_side) {
            z = sz;
            snapped = true;
        }
    };

    for part in registry.parts().filter(|p| p.id != dragged.id) {
        apply(part.bounds(), true);
    }
    for shelf in registry.shelves() {
        apply(shelf.bounds(), false);
    }

    if snapped {
        SnapResult {
            position: Point2D::new(x, z),
            snapped,
        }
    } else {
        SnapResult::unchanged(candidate)
    }
}
