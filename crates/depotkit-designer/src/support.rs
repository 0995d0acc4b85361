//! Support surface resolution.
//!
//! The resting height of an object is the highest surface strictly below its
//! bottom face: a shelf layer whose footprint contains the object's centre,
//! or the top face of overlapping cargo. The floor at 0 is the default.

use crate::objects::{Footprint, ObjectId, PlacedObject};
use crate::registry::ObjectRegistry;
use depotkit_core::{footprints_overlap, to_local_frame, Point2D, Vec3};
use depotkit_settings::PhysicsSettings;

/// Which surface an object rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportSource {
    Ground,
    ShelfLayer { shelf: ObjectId, layer: usize },
    Object(ObjectId),
}

/// Resolved support surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Support {
    pub height: f64,
    pub source: SupportSource,
}

impl Support {
    pub const GROUND: Support = Support {
        height: 0.0,
        source: SupportSource::Ground,
    };
}

/// Computes support heights from the registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupportResolver {
    layer_offset: f64,
    epsilon: f64,
    overlap_shrink: f64,
}

impl SupportResolver {
    pub fn new(physics: &PhysicsSettings) -> Self {
        Self {
            layer_offset: physics.layer_offset,
            epsilon: physics.support_epsilon,
            overlap_shrink: physics.overlap_shrink,
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn overlap_shrink(&self) -> f64 {
        self.overlap_shrink
    }

    /// Top Y of each layer of a shelf, lowest first.
    pub fn layer_heights(&self, shelf: &PlacedObject) -> Vec<f64> {
        let Some(spec) = shelf.shelf_spec() else {
            return Vec::new();
        };
        let count = spec.layer_count.max(1) as usize;
        let layer_height = shelf.footprint.height / count as f64;
        (0..count)
            .map(|i| shelf.bottom() + (i + 1) as f64 * layer_height - self.layer_offset)
            .collect()
    }

    /// Whether `point` lies within the shelf's footprint in its local frame.
    pub fn shelf_contains(&self, shelf: &PlacedObject, point: Point2D) -> bool {
        let local = to_local_frame(point, shelf.ground(), shelf.rotation);
        let (half_w, half_d) = shelf.footprint.half_extents();
        local.x.abs() <= half_w && local.z.abs() <= half_d
    }

    /// Support beneath an object at its current position.
    pub fn resolve(&self, registry: &ObjectRegistry, id: ObjectId) -> Support {
        match registry.get(id) {
            Some(object) => self.resolve_at(registry, id, object.position),
            None => Support::GROUND,
        }
    }

    /// Support beneath an object if its centre were at `position`.
    pub fn resolve_at(&self, registry: &ObjectRegistry, id: ObjectId, position: Vec3) -> Support {
        match registry.get(id) {
            Some(object) => self.resolve_for_footprint(registry, position, &object.footprint, Some(id)),
            None => Support::GROUND,
        }
    }

    /// Support beneath a box of `footprint` centred at `position`.
    ///
    /// Objects that are being deleted or dragged, and `exclude`, never act as
    /// support.
    pub fn resolve_for_footprint(
        &self,
        registry: &ObjectRegistry,
        position: Vec3,
        footprint: &Footprint,
        exclude: Option<ObjectId>,
    ) -> Support {
        let bottom = position.y - footprint.height / 2.0;
        let limit = bottom + self.epsilon;
        let centre = position.ground();
        let mut best = Support::GROUND;

        for shelf in registry.shelves() {
            if Some(shelf.id) == exclude || !self.shelf_contains(shelf, centre) {
                continue;
            }
            for (layer, height) in self.layer_heights(shelf).into_iter().enumerate() {
                if height < limit && height > best.height {
                    best = Support {
                        height,
                        source: SupportSource::ShelfLayer {
                            shelf: shelf.id,
                            layer,
                        },
                    };
                }
            }
        }

        let half = footprint.half_extents();
        for other in registry.cargos() {
            if Some(other.id) == exclude || other.being_deleted || other.is_dragging {
                continue;
            }
            if !footprints_overlap(
                centre,
                half,
                other.ground(),
                other.footprint.half_extents(),
                self.overlap_shrink,
            ) {
                continue;
            }
            let top = other.top();
            if top < limit && top > best.height {
                best = Support {
                    height: top,
                    source: SupportSource::Object(other.id),
                };
            }
        }

        best
    }

    /// Support height beneath an object at its current position.
    pub fn resolve_support_height(&self, registry: &ObjectRegistry, id: ObjectId) -> f64 {
        self.resolve(registry, id).height
    }

    /// Centre Y at which the object would rest.
    pub fn target_y(&self, registry: &ObjectRegistry, id: ObjectId) -> Option<f64> {
        let object = registry.get(id)?;
        Some(object.resting_y(self.resolve(registry, id).height))
    }
}

impl Default for SupportResolver {
    fn default() -> Self {
        Self::new(&PhysicsSettings::default())
    }
}
