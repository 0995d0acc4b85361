//! Gravity settle controller.
//!
//! Objects that float above their support are kept in a falling set and
//! advanced one fixed step per [`GravityController::tick`]. Each tick walks
//! the falling objects lowest first, so a stack comes down together: anything
//! resting on an object that moved is woken in the same tick, and an object
//! that reaches a support which is itself still falling rides along instead
//! of landing.

use crate::cascade::CascadeEngine;
use crate::objects::ObjectId;
use crate::registry::ObjectRegistry;
use crate::support::{SupportResolver, SupportSource};
use depotkit_core::Vec3;
use depotkit_settings::PhysicsSettings;
use std::collections::{BTreeSet, HashSet, VecDeque};

/// Result of [`GravityController::settle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettleOutcome {
    /// The object is missing or being dragged.
    Skipped,
    /// The object was already at its resting height and was snapped onto it.
    Snapped { y: f64 },
    /// The object will fall over the next ticks.
    Falling { target_y: f64 },
}

/// An object that came to rest during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    pub id: ObjectId,
    /// Centre position at rest.
    pub position: Vec3,
    pub rotation: f64,
}

impl Landing {
    /// Height of the bottom face at rest.
    pub fn base_y(&self, height: f64) -> f64 {
        self.position.y - height / 2.0
    }
}

/// Drives falling objects toward their support.
#[derive(Debug, Clone)]
pub struct GravityController {
    falling: BTreeSet<ObjectId>,
    fall_step: f64,
    epsilon: f64,
}

impl GravityController {
    pub fn new(physics: &PhysicsSettings) -> Self {
        Self {
            falling: BTreeSet::new(),
            fall_step: physics.fall_step,
            epsilon: physics.support_epsilon,
        }
    }

    pub fn fall_step(&self) -> f64 {
        self.fall_step
    }

    pub fn is_falling(&self, id: ObjectId) -> bool {
        self.falling.contains(&id)
    }

    pub fn falling_count(&self) -> usize {
        self.falling.len()
    }

    pub fn is_idle(&self) -> bool {
        self.falling.is_empty()
    }

    /// Stops tracking an object, e.g. when it is removed or picked up.
    pub fn cancel(&mut self, id: ObjectId) {
        self.falling.remove(&id);
    }

    pub fn clear(&mut self) {
        self.falling.clear();
    }

    /// Snaps an object onto its support when it is already there, otherwise
    /// marks it as falling.
    pub fn settle(&mut self, registry: &mut ObjectRegistry, resolver: &SupportResolver, id: ObjectId) -> SettleOutcome {
        let support = resolver.resolve(registry, id);
        let Some(object) = registry.get_mut(id) else {
            self.falling.remove(&id);
            return SettleOutcome::Skipped;
        };
        if object.is_dragging {
            return SettleOutcome::Skipped;
        }

        let target_y = object.resting_y(support.height);
        if (object.position.y - target_y).abs() < self.epsilon {
            object.position.y = target_y;
            object.support.grounded = true;
            object.support.velocity_y = 0.0;
            self.falling.remove(&id);
            return SettleOutcome::Snapped { y: target_y };
        }

        object.support.grounded = false;
        self.falling.insert(id);
        SettleOutcome::Falling { target_y }
    }

    /// Settles an object if it floats above its support, otherwise snaps it
    /// onto the support. Used after drops where the object may sit slightly
    /// below its resolved surface.
    pub fn settle_or_snap(&mut self, registry: &mut ObjectRegistry, resolver: &SupportResolver, id: ObjectId) -> SettleOutcome {
        let support = resolver.resolve(registry, id);
        let Some(object) = registry.get_mut(id) else {
            return SettleOutcome::Skipped;
        };
        let target_y = object.resting_y(support.height);
        if object.position.y > target_y + self.epsilon {
            return self.settle(registry, resolver, id);
        }
        object.position.y = target_y;
        object.support.grounded = true;
        object.support.velocity_y = 0.0;
        self.falling.remove(&id);
        SettleOutcome::Snapped { y: target_y }
    }

    /// Advances every falling object by one step.
    ///
    /// Returns the objects that came to rest on a stationary surface.
    pub fn tick(
        &mut self,
        registry: &mut ObjectRegistry,
        resolver: &SupportResolver,
        cascade: &CascadeEngine,
    ) -> Vec<Landing> {
        let mut landings = Vec::new();
        if self.falling.is_empty() {
            return landings;
        }

        self.falling.retain(|id| registry.contains(*id));
        let mut order: Vec<(f64, ObjectId)> = self
            .falling
            .iter()
            .filter_map(|id| registry.get(*id).map(|o| (o.bottom(), *id)))
            .collect();
        order.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut queue: VecDeque<ObjectId> = order.into_iter().map(|(_, id)| id).collect();
        let mut processed = HashSet::new();

        while let Some(id) = queue.pop_front() {
            if !processed.insert(id) {
                continue;
            }
            let support = resolver.resolve(registry, id);
            let Some(object) = registry.get_mut(id) else {
                self.falling.remove(&id);
                continue;
            };
            if object.is_dragging {
                self.falling.remove(&id);
                continue;
            }

            let before = object.position;
            let target_y = object.resting_y(support.height);
            let next_y = before.y - self.fall_step;

            if next_y <= target_y {
                object.position.y = target_y;
                let support_falling = match support.source {
                    SupportSource::Object(below) => self.falling.contains(&below),
                    _ => false,
                };
                if support_falling {
                    object.support.velocity_y = -self.fall_step;
                } else {
                    object.support.grounded = true;
                    object.support.velocity_y = 0.0;
                    self.falling.remove(&id);
                    tracing::debug!("Object {} landed at y={:.3}", id, target_y);
                    landings.push(Landing {
                        id,
                        position: object.position,
                        rotation: object.rotation,
                    });
                }
            } else {
                object.position.y = next_y;
                object.support.grounded = false;
                object.support.velocity_y = -self.fall_step;
            }

            if (object.position.y - before.y).abs() > f64::EPSILON {
                for above in cascade.stacked_on_top(registry, id, Some(before)) {
                    let Some(rider) = registry.get_mut(above) else {
                        continue;
                    };
                    if rider.is_dragging {
                        continue;
                    }
                    rider.support.grounded = false;
                    self.falling.insert(above);
                    if !processed.contains(&above) {
                        queue.push_back(above);
                    }
                }
            }
        }

        landings
    }

    /// Ticks until nothing is falling or `max_ticks` is reached.
    pub fn run_until_idle(
        &mut self,
        registry: &mut ObjectRegistry,
        resolver: &SupportResolver,
        cascade: &CascadeEngine,
        max_ticks: usize,
    ) -> Vec<Landing> {
        let mut landings = Vec::new();
        for _ in 0..max_ticks {
            if self.is_idle() {
                break;
            }
            landings.extend(self.tick(registry, resolver, cascade));
        }
        landings
    }
}

impl Default for GravityController {
    fn default() -> Self {
        Self::new(&PhysicsSettings::default())
    }
}
