//! Stacking cascade.
//!
//! When an object is removed or moved off its resting spot, everything that
//! was stacked on it must be re-settled, and so on up the stack.

use crate::gravity::GravityController;
use crate::objects::ObjectId;
use crate::registry::ObjectRegistry;
use crate::support::SupportResolver;
use depotkit_core::{footprints_overlap, Vec3};
use depotkit_settings::PhysicsSettings;
use smallvec::SmallVec;
use std::collections::{HashSet, VecDeque};

/// Finds stacked objects and propagates falls through them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeEngine {
    contact_tolerance: f64,
    overlap_shrink: f64,
}

impl CascadeEngine {
    pub fn new(physics: &PhysicsSettings) -> Self {
        Self {
            contact_tolerance: physics.contact_tolerance,
            overlap_shrink: physics.overlap_shrink,
        }
    }

    /// Cargo whose bottom face touches the top face of `origin`.
    ///
    /// `override_position` replaces the origin's centre, so stacks left behind
    /// at a previous location can still be found after it has moved.
    pub fn stacked_on_top(
        &self,
        registry: &ObjectRegistry,
        origin: ObjectId,
        override_position: Option<Vec3>,
    ) -> SmallVec<[ObjectId; 4]> {
        let mut stacked = SmallVec::new();
        let Some(base) = registry.get(origin).filter(|o| o.is_cargo()) else {
            return stacked;
        };
        let position = override_position.unwrap_or(base.position);
        let top = position.y + base.footprint.height / 2.0;
        let half = base.footprint.half_extents();

        for other in registry.cargos() {
            if other.id == origin {
                continue;
            }
            let overlapping = footprints_overlap(
                position.ground(),
                half,
                other.ground(),
                other.footprint.half_extents(),
                self.overlap_shrink,
            );
            if overlapping && (other.bottom() - top).abs() < self.contact_tolerance {
                stacked.push(other.id);
            }
        }
        stacked
    }

    /// Re-settles everything stacked above `origin`, breadth first.
    ///
    /// Each object is re-settled at most once. The origin itself is not marked
    /// as processed, so it is re-settled too if it now sits on its former
    /// stack. Returns the affected objects in visit order.
    pub fn propagate_fall(
        &self,
        registry: &mut ObjectRegistry,
        resolver: &SupportResolver,
        gravity: &mut GravityController,
        origin: ObjectId,
        override_position: Option<Vec3>,
    ) -> Vec<ObjectId> {
        let mut processed = HashSet::new();
        let mut affected = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back((origin, override_position));

        while let Some((current, position)) = queue.pop_front() {
            for above in self.stacked_on_top(registry, current, position) {
                if !processed.insert(above) {
                    continue;
                }
                if let Some(object) = registry.get_mut(above) {
                    object.support.grounded = false;
                }
                gravity.settle(registry, resolver, above);
                affected.push(above);
                queue.push_back((above, None));
            }
        }

        if !affected.is_empty() {
            tracing::debug!(
                "Cascade from {} re-settled {} object(s)",
                origin,
                affected.len()
            );
        }
        affected
    }
}

impl Default for CascadeEngine {
    fn default() -> Self {
        Self::new(&PhysicsSettings::default())
    }
}
