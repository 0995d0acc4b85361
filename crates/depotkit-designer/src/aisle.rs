//! Committed aisles and their render geometry.
//!
//! An aisle is a path plus a width. It is rendered as one flat box per
//! segment and a round corner piece at every interior vertex, and persisted
//! as `{path: [{x, z}, ...], width}`.

use crate::path_graph::Path;
use depotkit_core::{LayoutError, Point2D, VERTEX_EPSILON};
use serde::{Deserialize, Serialize};

/// Width used when a persisted aisle has none.
pub const DEFAULT_AISLE_WIDTH: f64 = 2.0;

/// Thickness of an aisle floor segment.
pub const AISLE_HEIGHT: f64 = 0.05;

/// A committed aisle.
#[derive(Debug, Clone, PartialEq)]
pub struct Aisle {
    pub path: Path,
    pub width: f64,
}

/// Box covering one aisle segment, centred at its midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AisleSegment {
    pub center: Point2D,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation about the vertical axis.
    pub yaw: f64,
}

/// Disc filling the joint at an interior vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AisleCorner {
    pub center: Point2D,
    pub radius: f64,
}

/// Render pieces of one aisle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AisleGeometry {
    pub segments: Vec<AisleSegment>,
    pub corners: Vec<AisleCorner>,
}

/// Left and right edge lines of one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidthOutline {
    pub left: (Point2D, Point2D),
    pub right: (Point2D, Point2D),
}

impl Aisle {
    pub fn new(path: Path, width: f64) -> Self {
        Self { path, width }
    }

    /// Builds the segment boxes and corner discs.
    ///
    /// Segments shorter than the vertex tolerance produce no box.
    pub fn geometry(&self) -> AisleGeometry {
        let segments = self
            .path
            .segments()
            .filter_map(|(a, b)| {
                let dx = b.x - a.x;
                let dz = b.z - a.z;
                let length = (dx * dx + dz * dz).sqrt();
                if length < VERTEX_EPSILON {
                    return None;
                }
                Some(AisleSegment {
                    center: Point2D::new((a.x + b.x) / 2.0, (a.z + b.z) / 2.0),
                    length,
                    width: self.width,
                    height: AISLE_HEIGHT,
                    yaw: -dz.atan2(dx),
                })
            })
            .collect();

        let points = self.path.points();
        let corners = points
            .iter()
            .skip(1)
            .take(points.len().saturating_sub(2))
            .map(|p| AisleCorner {
                center: *p,
                radius: self.width / 2.0,
            })
            .collect();

        AisleGeometry { segments, corners }
    }

    pub fn to_record(&self) -> AisleRecord {
        AisleRecord {
            path: self.path.points().to_vec(),
            width: self.width,
        }
    }
}

/// Dashed edge lines offset by half the width on either side of each
/// segment. Segments shorter than the vertex tolerance are skipped.
pub fn width_outline(path: &Path, width: f64) -> Vec<WidthOutline> {
    let half = width / 2.0;
    path.segments()
        .filter_map(|(a, b)| {
            let dx = b.x - a.x;
            let dz = b.z - a.z;
            let length = (dx * dx + dz * dz).sqrt();
            if length < VERTEX_EPSILON {
                return None;
            }
            let nx = -dz / length * half;
            let nz = dx / length * half;
            Some(WidthOutline {
                left: (a.offset(nx, nz), b.offset(nx, nz)),
                right: (a.offset(-nx, -nz), b.offset(-nx, -nz)),
            })
        })
        .collect()
}

fn default_width() -> f64 {
    DEFAULT_AISLE_WIDTH
}

/// Persisted aisle entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AisleRecord {
    pub path: Vec<Point2D>,
    #[serde(default = "default_width")]
    pub width: f64,
}

impl AisleRecord {
    /// Checks the record can become an aisle.
    pub fn validate(&self, index: usize) -> Result<(), LayoutError> {
        if self.path.len() < 2 {
            return Err(LayoutError::PathTooShort {
                index,
                points: self.path.len(),
            });
        }
        if self.width <= 0.0 {
            return Err(LayoutError::NonPositiveWidth {
                index,
                width: self.width,
            });
        }
        Ok(())
    }
}

/// Converts persisted records into aisles, skipping invalid entries.
pub fn aisles_from_records(records: &[AisleRecord]) -> Vec<Aisle> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match record.validate(index) {
            Ok(()) => Some(Aisle::new(Path::new(record.path.clone()), record.width)),
            Err(e) => {
                tracing::warn!("Skipping aisle: {}", e);
                None
            }
        })
        .collect()
}
