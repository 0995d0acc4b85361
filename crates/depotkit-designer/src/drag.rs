//! Pointer drag of shelves, cargo and parts.
//!
//! A drag keeps the pointer-to-object offset captured at the press so the
//! object does not jump, clamps to the warehouse floor and snaps to nearby
//! edges. Shelves carry the cargo standing on them rigidly. Cargo can be
//! lifted and lowered in vertical mode, scaled by the camera distance so the
//! motion tracks the pointer at any zoom.

use crate::objects::ObjectId;
use crate::registry::ObjectRegistry;
use crate::scene::CameraState;
use crate::snapping::{snap_part, snap_to_shelf_edges};
use depotkit_core::{Point2D, Vec3};
use depotkit_settings::Config;

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Shelf,
    Cargo,
    Part,
}

/// Limits and snapping thresholds applied while dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragContext {
    /// Half the floor size along X and Z.
    pub half_extents: (f64, f64),
    /// Threshold for shelf edge snapping, `None` when snapping is off.
    pub shelf_snap: Option<f64>,
    /// Threshold for part edge snapping, `None` when snapping is off.
    pub part_snap: Option<f64>,
}

impl DragContext {
    pub fn from_config(config: &Config) -> Self {
        let enabled = config.snapping.enabled;
        Self {
            half_extents: config.environment.half_extents(),
            shelf_snap: enabled.then(|| config.snapping.shelf_threshold_world(config.global.unit)),
            part_snap: enabled.then_some(config.snapping.part_threshold),
        }
    }

    fn clamp(&self, p: Point2D) -> Point2D {
        let (hx, hz) = self.half_extents;
        Point2D::new(p.x.clamp(-hx, hx), p.z.clamp(-hz, hz))
    }
}

impl Default for DragContext {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CarriedCargo {
    id: ObjectId,
    initial: Point2D,
}

/// Reference for vertical mode: pointer height and object position when
/// vertical mode started.
#[derive(Debug, Clone, Copy, PartialEq)]
struct VerticalAnchor {
    screen_y: f64,
    position: Vec3,
}

/// How a drag ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEnd {
    /// The object was moved from `from` to `to`.
    Moved {
        id: ObjectId,
        kind: DragKind,
        from: Vec3,
        to: Vec3,
        carried: Vec<ObjectId>,
    },
    /// The pointer was released without moving: a click.
    Clicked { id: ObjectId, kind: DragKind },
}

/// The single active drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    target: ObjectId,
    kind: DragKind,
    offset: Point2D,
    initial: Vec3,
    carried: Vec<CarriedCargo>,
    anchor: Option<VerticalAnchor>,
    moved: bool,
}

impl DragSession {
    /// Starts dragging `id` grabbed at floor point `pointer`.
    ///
    /// Dragged cargo is selected and taken out of the simulation; a dragged
    /// shelf records the cargo standing on it.
    pub fn begin(registry: &mut ObjectRegistry, id: ObjectId, pointer: Point2D, screen_y: f64) -> Option<Self> {
        let object = registry.get(id)?;
        let kind = if object.is_shelf() {
            DragKind::Shelf
        } else if object.is_cargo() {
            DragKind::Cargo
        } else {
            DragKind::Part
        };
        let initial = object.position;
        let offset = Point2D::new(initial.x - pointer.x, initial.z - pointer.z);

        let carried = match kind {
            DragKind::Shelf => registry
                .cargos_on_shelf(id)
                .into_iter()
                .filter_map(|cargo| {
                    registry.get(cargo).map(|o| CarriedCargo {
                        id: cargo,
                        initial: o.ground(),
                    })
                })
                .collect(),
            _ => Vec::new(),
        };

        if kind == DragKind::Cargo {
            registry.select_cargo(Some(id));
            if let Some(cargo) = registry.get_mut(id) {
                cargo.is_dragging = true;
            }
        }

        tracing::debug!("Drag of {:?} {} started with {} carried", kind, id, carried.len());
        Some(Self {
            target: id,
            kind,
            offset,
            initial,
            carried,
            anchor: Some(VerticalAnchor {
                screen_y,
                position: initial,
            }),
            moved: false,
        })
    }

    pub fn target(&self) -> ObjectId {
        self.target
    }

    pub fn kind(&self) -> DragKind {
        self.kind
    }

    pub fn initial_position(&self) -> Vec3 {
        self.initial
    }

    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// Cargo moved along with a dragged shelf.
    pub fn carried(&self) -> Vec<ObjectId> {
        self.carried.iter().map(|c| c.id).collect()
    }

    /// Moves the object for a pointer at floor point `pointer`.
    ///
    /// `vertical` switches cargo to height adjustment from the pointer's
    /// screen height. Returns the new centre position.
    pub fn update(
        &mut self,
        registry: &mut ObjectRegistry,
        ctx: &DragContext,
        pointer: Point2D,
        screen_y: f64,
        vertical: bool,
        camera: &CameraState,
    ) -> Option<Vec3> {
        let candidate = ctx.clamp(pointer.offset(self.offset.x, self.offset.z));
        let dragged = registry.get(self.target)?.clone();

        let position = match self.kind {
            DragKind::Shelf => {
                let snapped = match ctx.shelf_snap {
                    Some(threshold) => snap_to_shelf_edges(registry, &dragged, candidate, threshold).position,
                    None => candidate,
                };
                let dx = snapped.x - self.initial.x;
                let dz = snapped.z - self.initial.z;
                for carried in &self.carried {
                    if let Some(cargo) = registry.get_mut(carried.id) {
                        cargo.position.x = carried.initial.x + dx;
                        cargo.position.z = carried.initial.z + dz;
                    }
                }
                Vec3::new(snapped.x, dragged.footprint.height / 2.0, snapped.z)
            }
            DragKind::Cargo if vertical => {
                let anchor = *self.anchor.get_or_insert(VerticalAnchor {
                    screen_y,
                    position: dragged.position,
                });
                let distance = camera.distance_to(dragged.position);
                let adjustment = -(screen_y - anchor.screen_y) * distance * 0.5;
                let y = (anchor.position.y + adjustment).max(dragged.footprint.height / 2.0);
                Vec3::new(anchor.position.x, y, anchor.position.z)
            }
            DragKind::Cargo => {
                self.anchor = None;
                let snapped = match ctx.shelf_snap {
                    Some(threshold) => snap_to_shelf_edges(registry, &dragged, candidate, threshold).position,
                    None => candidate,
                };
                Vec3::new(snapped.x, dragged.position.y, snapped.z)
            }
            DragKind::Part => {
                let snapped = match ctx.part_snap {
                    Some(threshold) => snap_part(registry, &dragged, candidate, threshold).position,
                    None => candidate,
                };
                Vec3::new(snapped.x, dragged.position.y, snapped.z)
            }
        };

        let object = registry.get_mut(self.target)?;
        object.position = position;
        self.moved = true;
        Some(position)
    }

    /// Releases the object.
    pub fn end(self, registry: &mut ObjectRegistry) -> DragEnd {
        let to = match registry.get_mut(self.target) {
            Some(object) => {
                object.is_dragging = false;
                object.position
            }
            None => self.initial,
        };
        if self.moved {
            tracing::debug!("Drag of {} ended at {:?}", self.target, to);
            DragEnd::Moved {
                id: self.target,
                kind: self.kind,
                from: self.initial,
                to,
                carried: self.carried(),
            }
        } else {
            DragEnd::Clicked {
                id: self.target,
                kind: self.kind,
            }
        }
    }

    /// Aborts the drag and restores every moved object.
    pub fn cancel(self, registry: &mut ObjectRegistry) {
        if let Some(object) = registry.get_mut(self.target) {
            object.position = self.initial;
            object.is_dragging = false;
        }
        for carried in &self.carried {
            if let Some(cargo) = registry.get_mut(carried.id) {
                cargo.position.x = carried.initial.x;
                cargo.position.z = carried.initial.z;
            }
        }
    }
}
