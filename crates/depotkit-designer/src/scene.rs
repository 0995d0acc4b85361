//! Rendering collaborator.
//!
//! The editor mirrors every visible change into a [`Scene`] and asks it for
//! pointer ray hits and the camera pose. [`HeadlessScene`] keeps the nodes in
//! memory and ray-casts against their boxes, which is all the CLI and the
//! tests need.

use crate::aisle::AisleGeometry;
use crate::aisle_editor::AislePreview;
use crate::objects::{Footprint, ObjectId, PlacedObject};
use depotkit_core::{Point2D, Vec3};
use nalgebra::{Point3, Rotation3, Vector3};
use std::collections::HashMap;

/// Identifies a node in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKey {
    Object(ObjectId),
    Aisle(usize),
    AisleOverlay,
    PlacementPreview,
}

/// An oriented box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxNode {
    pub center: Vec3,
    pub footprint: Footprint,
    pub rotation: f64,
    /// Whether pointer rays can hit it.
    pub pickable: bool,
}

impl BoxNode {
    pub fn from_object(object: &PlacedObject) -> Self {
        Self {
            center: object.position,
            footprint: object.footprint,
            rotation: object.rotation,
            pickable: true,
        }
    }

    /// Entry distance of `ray` along its direction, if it hits.
    pub fn intersect(&self, ray: &PointerRay) -> Option<f64> {
        let to_local = Rotation3::from_axis_angle(&Vector3::y_axis(), -self.rotation);
        let origin = to_local
            * Point3::new(
                ray.origin.x - self.center.x,
                ray.origin.y - self.center.y,
                ray.origin.z - self.center.z,
            );
        let direction = to_local * Vector3::new(ray.direction.x, ray.direction.y, ray.direction.z);
        let half = Vector3::new(
            self.footprint.width / 2.0,
            self.footprint.height / 2.0,
            self.footprint.depth / 2.0,
        );

        let mut t_near = f64::NEG_INFINITY;
        let mut t_far = f64::INFINITY;
        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            if d.abs() < 1e-12 {
                if o < -half[axis] || o > half[axis] {
                    return None;
                }
                continue;
            }
            let t1 = (-half[axis] - o) / d;
            let t2 = (half[axis] - o) / d;
            t_near = t_near.max(t1.min(t2));
            t_far = t_far.min(t1.max(t2));
            if t_near > t_far {
                return None;
            }
        }
        if t_far < 0.0 {
            return None;
        }
        Some(if t_near >= 0.0 { t_near } else { t_far })
    }
}

/// Content of a scene node.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Box(BoxNode),
    Aisle(AisleGeometry),
    AisleOverlay(AislePreview),
}

/// World-space ray under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerRay {
    pub origin: Vec3,
    pub direction: Vec3,
    /// Pointer height in normalised device coordinates, +1 at the bottom edge.
    pub screen_y: f64,
}

impl PointerRay {
    pub fn new(origin: Vec3, direction: Vec3, screen_y: f64) -> Self {
        Self {
            origin,
            direction,
            screen_y,
        }
    }

    /// A ray pointing straight down onto `point`, as used by tests and scripts.
    pub fn straight_down(point: Point2D, from_height: f64) -> Self {
        Self::new(
            Vec3::new(point.x, from_height, point.z),
            Vec3::new(0.0, -1.0, 0.0),
            0.0,
        )
    }

    pub fn at(&self, t: f64) -> Vec3 {
        Vec3::new(
            self.origin.x + self.direction.x * t,
            self.origin.y + self.direction.y * t,
            self.origin.z + self.direction.z * t,
        )
    }

    /// Point where the ray crosses the floor plane.
    pub fn intersect_ground(&self) -> Option<Point2D> {
        if self.direction.y.abs() < 1e-12 {
            return None;
        }
        let t = -self.origin.y / self.direction.y;
        (t >= 0.0).then(|| self.at(t).ground())
    }
}

/// One pointer ray hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub key: SceneKey,
    pub point: Vec3,
    pub distance: f64,
}

impl RayHit {
    pub fn object(&self) -> Option<ObjectId> {
        match self.key {
            SceneKey::Object(id) => Some(id),
            _ => None,
        }
    }
}

/// Camera pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraState {
    pub fn distance_to(&self, point: Vec3) -> f64 {
        self.position.distance_to(&point)
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 30.0, 30.0),
            target: Vec3::default(),
        }
    }
}

/// Rendering collaborator used by the editor.
pub trait Scene {
    /// Adds or replaces the node under `key`.
    fn add_object(&mut self, key: SceneKey, node: SceneNode);

    fn remove_object(&mut self, key: SceneKey);

    /// Pickable hits along `ray`, nearest first.
    fn raycast_from_pointer(&self, ray: &PointerRay) -> Vec<RayHit>;

    fn camera_state(&self) -> CameraState;
}

/// In-memory scene.
#[derive(Debug, Clone, Default)]
pub struct HeadlessScene {
    nodes: HashMap<SceneKey, SceneNode>,
    camera: CameraState,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_camera(&mut self, camera: CameraState) {
        self.camera = camera;
    }

    pub fn node(&self, key: SceneKey) -> Option<&SceneNode> {
        self.nodes.get(&key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn object_count(&self) -> usize {
        self.nodes
            .keys()
            .filter(|k| matches!(k, SceneKey::Object(_)))
            .count()
    }
}

impl Scene for HeadlessScene {
    fn add_object(&mut self, key: SceneKey, node: SceneNode) {
        self.nodes.insert(key, node);
    }

    fn remove_object(&mut self, key: SceneKey) {
        self.nodes.remove(&key);
    }

    fn raycast_from_pointer(&self, ray: &PointerRay) -> Vec<RayHit> {
        let scale = (ray.direction.x.powi(2) + ray.direction.y.powi(2) + ray.direction.z.powi(2)).sqrt();
        let mut hits: Vec<RayHit> = self
            .nodes
            .iter()
            .filter_map(|(key, node)| match node {
                SceneNode::Box(b) if b.pickable => b.intersect(ray).map(|t| RayHit {
                    key: *key,
                    point: ray.at(t),
                    distance: t * scale,
                }),
                _ => None,
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn camera_state(&self) -> CameraState {
        self.camera
    }
}
