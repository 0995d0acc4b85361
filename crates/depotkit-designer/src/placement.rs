//! Placement of new objects and repositioning of existing cargo.

use crate::objects::{Footprint, ObjectId, PartKind, SkuSpec};
use crate::registry::ObjectRegistry;
use crate::scene::RayHit;
use crate::support::SupportResolver;
use depotkit_core::{wrap_angle, Point2D, Vec3};
use std::f64::consts::FRAC_PI_2;

/// Tolerance below a shelf layer within which a hit still counts as that layer.
pub const LAYER_HIT_TOLERANCE: f64 = 0.1;

/// Where a cargo would be put down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementPosition {
    /// X/Z of the centre, Y of the bottom face.
    pub position: Vec3,
    /// Cargo whose top face the new cargo is stacked on.
    pub stack_on: Option<ObjectId>,
}

/// Resolves a drop position from the pointer ray hits.
///
/// The nearest cargo hit other than `exclude` stacks onto that cargo's top at
/// its X/Z. Otherwise the first shelf hit drops onto the highest layer at or
/// below the hit point, and failing that the floor point under the pointer is
/// used.
pub fn placement_position(
    registry: &ObjectRegistry,
    resolver: &SupportResolver,
    hits: &[RayHit],
    ground: Option<Point2D>,
    exclude: Option<ObjectId>,
) -> Option<PlacementPosition> {
    let nearest_cargo = hits
        .iter()
        .filter_map(|hit| hit.object().and_then(|id| registry.get(id)))
        .find(|object| object.is_cargo() && Some(object.id) != exclude);
    if let Some(cargo) = nearest_cargo {
        return Some(PlacementPosition {
            position: Vec3::new(cargo.position.x, cargo.top(), cargo.position.z),
            stack_on: Some(cargo.id),
        });
    }

    let shelf_hit = hits.iter().find_map(|hit| {
        let shelf = hit.object().and_then(|id| registry.get(id))?;
        shelf.is_shelf().then_some((hit, shelf))
    });
    if let Some((hit, shelf)) = shelf_hit {
        let layer_y = resolver
            .layer_heights(shelf)
            .into_iter()
            .filter(|layer| hit.point.y >= layer - LAYER_HIT_TOLERANCE)
            .fold(0.0_f64, f64::max);
        return Some(PlacementPosition {
            position: Vec3::new(hit.point.x, layer_y, hit.point.z),
            stack_on: None,
        });
    }

    ground.map(|g| PlacementPosition {
        position: Vec3::new(g.x, 0.0, g.z),
        stack_on: None,
    })
}

/// What is being placed.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementKind {
    Cargo(SkuSpec),
    Part(PartKind),
}

impl PlacementKind {
    pub fn footprint(&self) -> Footprint {
        match self {
            Self::Cargo(sku) => sku.footprint(),
            Self::Part(kind) => kind.default_footprint(),
        }
    }
}

/// Placement mode for a new cargo or part.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementSession {
    kind: PlacementKind,
    preview: Option<PlacementPosition>,
}

impl PlacementSession {
    pub fn new(kind: PlacementKind) -> Self {
        Self { kind, preview: None }
    }

    pub fn kind(&self) -> &PlacementKind {
        &self.kind
    }

    /// Drop position of the last preview, if the pointer was over something.
    pub fn preview(&self) -> Option<PlacementPosition> {
        self.preview
    }

    /// Centre of the ghost box for the last preview.
    pub fn preview_center(&self) -> Option<Vec3> {
        let footprint = self.kind.footprint();
        self.preview
            .map(|p| p.position.with_y(p.position.y + footprint.height / 2.0))
    }

    /// Follows the pointer. Parts always go on the floor.
    pub fn update(
        &mut self,
        registry: &ObjectRegistry,
        resolver: &SupportResolver,
        hits: &[RayHit],
        ground: Option<Point2D>,
    ) -> Option<PlacementPosition> {
        self.preview = match self.kind {
            PlacementKind::Cargo(_) => placement_position(registry, resolver, hits, ground, None),
            PlacementKind::Part(_) => ground.map(|g| PlacementPosition {
                position: Vec3::new(g.x, 0.0, g.z),
                stack_on: None,
            }),
        };
        self.preview
    }
}

/// Double-click repositioning of one cargo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepositionSession {
    target: ObjectId,
    original_position: Vec3,
    original_rotation: f64,
    last: Option<PlacementPosition>,
}

impl RepositionSession {
    /// Captures the cargo's transform and lifts it out of the simulation.
    pub fn begin(registry: &mut ObjectRegistry, target: ObjectId) -> Option<Self> {
        let cargo = registry.get_mut(target).filter(|o| o.is_cargo())?;
        cargo.is_dragging = true;
        tracing::debug!("Repositioning {} from {:?}", target, cargo.position);
        Some(Self {
            target,
            original_position: cargo.position,
            original_rotation: cargo.rotation,
            last: None,
        })
    }

    pub fn target(&self) -> ObjectId {
        self.target
    }

    pub fn original_position(&self) -> Vec3 {
        self.original_position
    }

    pub fn original_rotation(&self) -> f64 {
        self.original_rotation
    }

    /// Moves the cargo to the drop position under the pointer.
    pub fn preview(
        &mut self,
        registry: &mut ObjectRegistry,
        resolver: &SupportResolver,
        hits: &[RayHit],
        ground: Option<Point2D>,
    ) -> Option<PlacementPosition> {
        let placement = placement_position(registry, resolver, hits, ground, Some(self.target))?;
        self.last = Some(placement);
        apply_placement(registry, resolver, self.target, placement);
        Some(placement)
    }

    /// Quarter turn about the vertical axis. Returns the new rotation.
    pub fn rotate(&self, registry: &mut ObjectRegistry) -> Option<f64> {
        let cargo = registry.get_mut(self.target)?;
        cargo.rotation = wrap_angle(cargo.rotation + FRAC_PI_2);
        Some(cargo.rotation)
    }

    /// Puts the cargo back exactly where it was.
    pub fn cancel(self, registry: &mut ObjectRegistry) {
        if let Some(cargo) = registry.get_mut(self.target) {
            cargo.position = self.original_position;
            cargo.rotation = self.original_rotation;
            cargo.is_dragging = false;
        }
        tracing::debug!("Reposition of {} cancelled", self.target);
    }

    /// Places the cargo at `placement` (or leaves it where the last preview
    /// put it) and hands it back to the simulation.
    ///
    /// Returns whether the cargo was stacked directly onto another cargo.
    pub fn commit(
        self,
        registry: &mut ObjectRegistry,
        resolver: &SupportResolver,
        placement: Option<PlacementPosition>,
    ) -> bool {
        if let Some(cargo) = registry.get_mut(self.target) {
            cargo.is_dragging = false;
        }
        match placement {
            Some(p) => {
                apply_placement(registry, resolver, self.target, p);
                p.stack_on.is_some()
            }
            None => false,
        }
    }
}

/// Moves `id` onto a drop position: directly onto a stacked cargo's top, or
/// to the resolved support under the drop point.
fn apply_placement(registry: &mut ObjectRegistry, resolver: &SupportResolver, id: ObjectId, placement: PlacementPosition) {
    let Some(cargo) = registry.get_mut(id) else {
        return;
    };
    let half_height = cargo.footprint.height / 2.0;
    let p = placement.position;
    cargo.position = Vec3::new(p.x, p.y + half_height, p.z);
    if placement.stack_on.is_none() {
        let support = resolver.resolve(registry, id);
        if let Some(cargo) = registry.get_mut(id) {
            cargo.position.y = support.height + half_height;
        }
    }
}
