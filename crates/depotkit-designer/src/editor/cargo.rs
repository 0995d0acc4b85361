//! Cargo lifecycle: placement, loading, deletion, manual moves and
//! repositioning.

use super::WarehouseEditor;
use crate::objects::{ObjectId, PartKind, PlacedObject, SkuSpec};
use crate::persistence::{PendingWrite, PersistOp};
use crate::placement::{placement_position, PlacementKind, PlacementPosition, PlacementSession, RepositionSession};
use crate::scene::{BoxNode, PointerRay, Scene, SceneKey, SceneNode};
use crate::store::{CargoPose, CargoRecord};
use depotkit_core::Vec3;

impl<S: Scene> WarehouseEditor<S> {
    /// Enters placement mode for cargo of `sku`.
    pub fn begin_cargo_placement(&mut self, sku: SkuSpec) {
        self.end_placement();
        tracing::info!("Placing cargo {}", sku.display_name());
        self.placement = Some(PlacementSession::new(PlacementKind::Cargo(sku)));
    }

    /// Enters placement mode for a part.
    pub fn begin_part_placement(&mut self, kind: PartKind) {
        self.end_placement();
        tracing::info!("Placing {}", kind);
        self.placement = Some(PlacementSession::new(PlacementKind::Part(kind)));
    }

    /// Leaves placement mode without placing anything.
    pub fn end_placement(&mut self) {
        if self.placement.take().is_some() {
            self.scene.remove_object(SceneKey::PlacementPreview);
        }
    }

    /// Moves the placement ghost under the pointer.
    pub fn update_placement(&mut self, ray: &PointerRay) -> Option<PlacementPosition> {
        let hits = self.scene.raycast_from_pointer(ray);
        let session = self.placement.as_mut()?;
        let preview = session.update(&self.registry, &self.resolver, &hits, ray.intersect_ground());
        let footprint = session.kind().footprint();
        match session.preview_center() {
            Some(center) => self.scene.add_object(
                SceneKey::PlacementPreview,
                SceneNode::Box(BoxNode {
                    center,
                    footprint,
                    rotation: 0.0,
                    pickable: false,
                }),
            ),
            None => self.scene.remove_object(SceneKey::PlacementPreview),
        }
        preview
    }

    /// Places the pending cargo or part under the pointer.
    ///
    /// Cargo placement stays active for further drops; part placement ends
    /// after one part.
    pub fn commit_placement(&mut self, ray: &PointerRay) -> Option<ObjectId> {
        let hits = self.scene.raycast_from_pointer(ray);
        let ground = ray.intersect_ground();
        let kind = self.placement.as_ref()?.kind().clone();
        match kind {
            PlacementKind::Cargo(sku) => {
                let target = placement_position(&self.registry, &self.resolver, &hits, ground, None)?;
                let (id, _pending) = self.place_cargo(&sku, target.position);
                Some(id)
            }
            PlacementKind::Part(part) => {
                let at = ground?;
                let id = self.add_part(part, at);
                self.end_placement();
                Some(id)
            }
        }
    }

    /// Creates cargo whose bottom face is at `base` and queues its backend
    /// record. The record id is attached on a later tick.
    pub fn place_cargo(&mut self, sku: &SkuSpec, base: Vec3) -> (ObjectId, PendingWrite) {
        let id = self.registry.generate_id();
        let mut cargo = PlacedObject::cargo(id, sku, base, None);
        cargo.support.grounded = false;
        self.registry.insert(cargo);
        self.gravity.settle(&mut self.registry, &self.resolver, id);
        self.sync_object(id);
        tracing::info!("Placed cargo {} ({}) at {:?}", id, sku.id, base);

        let pending = self.submit(PersistOp::CreateCargo {
            local: id,
            sku_id: sku.id.clone(),
            pose: CargoPose::new(base.x, base.y, base.z, 0.0),
        });
        (id, pending)
    }

    /// Adds cargo from backend records. Records are not re-created.
    pub fn load_cargos(&mut self, records: &[CargoRecord]) -> Vec<ObjectId> {
        let mut loaded = Vec::with_capacity(records.len());
        for record in records {
            let mut sku = record.sku.clone();
            if sku.id.is_empty() {
                sku.id = record.sku_id.clone();
            }
            let id = self.registry.generate_id();
            let base = Vec3::new(record.pose.x, record.pose.y, record.pose.z);
            let cargo = PlacedObject::cargo(id, &sku, base, Some(record.id.clone())).with_rotation(record.pose.rotation);
            self.registry.insert(cargo);
            self.sync_object(id);
            loaded.push(id);
        }
        tracing::info!("Loaded {} cargo record(s)", loaded.len());
        loaded
    }

    /// Deletes cargo, letting anything stacked on it fall.
    pub fn delete_cargo(&mut self, id: ObjectId) -> Option<PendingWrite> {
        let object = self.registry.get_mut(id).filter(|o| o.is_cargo())?;
        object.being_deleted = true;
        if self.reposition.is_some_and(|r| r.target() == id) {
            self.reposition = None;
        }
        if self.drag.as_ref().is_some_and(|d| d.target() == id) {
            self.drag = None;
        }

        let affected = self
            .cascade
            .propagate_fall(&mut self.registry, &self.resolver, &mut self.gravity, id, None);
        for above in &affected {
            self.sync_object(*above);
        }

        let removed = self.registry.remove(id)?;
        self.gravity.cancel(id);
        self.sync_object(id);
        tracing::info!("Deleted cargo {} ({} above it re-settled)", id, affected.len());

        let db_id = removed.db_id()?.to_string();
        Some(self.submit(PersistOp::DeleteCargo { db_id }))
    }

    pub fn delete_selected_cargo(&mut self) -> Option<PendingWrite> {
        let id = self.registry.selected_cargo()?;
        self.delete_cargo(id)
    }

    /// Removes every cargo.
    pub fn clear_all_cargos(&mut self) -> PendingWrite {
        if let Some(session) = self.reposition.take() {
            session.cancel(&mut self.registry);
        }
        if self
            .drag
            .as_ref()
            .and_then(|d| self.registry.get(d.target()))
            .is_some_and(|o| o.is_cargo())
        {
            self.drag = None;
        }
        let removed = self.registry.clear_cargos();
        for cargo in &removed {
            self.gravity.cancel(cargo.id);
            self.scene.remove_object(SceneKey::Object(cargo.id));
        }
        tracing::info!("Cleared {} cargo", removed.len());
        self.submit(PersistOp::ClearCargos)
    }

    pub fn select_cargo(&mut self, id: Option<ObjectId>) {
        self.registry.select_cargo(id);
    }

    /// Moves cargo to an entered position, `base_y` being its bottom face,
    /// then settles it.
    pub fn apply_cargo_position(&mut self, id: ObjectId, x: f64, base_y: f64, z: f64) -> Option<PendingWrite> {
        let cargo = self.registry.get_mut(id).filter(|o| o.is_cargo())?;
        cargo.position = Vec3::new(x, base_y + cargo.footprint.height / 2.0, z);
        self.gravity
            .settle_or_snap(&mut self.registry, &self.resolver, id);
        self.sync_object(id);
        self.persist_cargo_pose(id)
    }

    /// Starts repositioning cargo (double-click).
    pub fn begin_reposition(&mut self, id: ObjectId) -> bool {
        if self.reposition.is_some() || self.drag.is_some() {
            return false;
        }
        self.gravity.cancel(id);
        match RepositionSession::begin(&mut self.registry, id) {
            Some(session) => {
                tracing::info!("Repositioning cargo {}", id);
                self.reposition = Some(session);
                true
            }
            None => false,
        }
    }

    /// Moves the repositioned cargo to the drop position under the pointer.
    pub fn update_reposition(&mut self, ray: &PointerRay) -> Option<PlacementPosition> {
        let hits = self.scene.raycast_from_pointer(ray);
        let session = self.reposition.as_mut()?;
        let target = session.target();
        let placement = session.preview(&mut self.registry, &self.resolver, &hits, ray.intersect_ground());
        self.sync_object(target);
        placement
    }

    /// Quarter turn of the repositioned cargo.
    pub fn rotate_reposition(&mut self) -> Option<f64> {
        let session = self.reposition?;
        let rotation = session.rotate(&mut self.registry)?;
        self.sync_object(session.target());
        Some(rotation)
    }

    /// Restores the repositioned cargo to where it was.
    pub fn cancel_reposition(&mut self) -> bool {
        let Some(session) = self.reposition.take() else {
            return false;
        };
        let id = session.target();
        session.cancel(&mut self.registry);
        self.sync_object(id);
        true
    }

    /// Drops the repositioned cargo under the pointer.
    ///
    /// Whatever was stacked on its original spot falls, the cargo rests on
    /// the drop surface, and its position and rotation are saved.
    pub fn commit_reposition(&mut self, ray: &PointerRay) -> Option<ObjectId> {
        let session = self.reposition.take()?;
        let id = session.target();
        let hits = self.scene.raycast_from_pointer(ray);

        let affected = self.cascade.propagate_fall(
            &mut self.registry,
            &self.resolver,
            &mut self.gravity,
            id,
            Some(session.original_position()),
        );

        let placement = placement_position(&self.registry, &self.resolver, &hits, ray.intersect_ground(), Some(id));
        let stacked = session.commit(&mut self.registry, &self.resolver, placement);
        if stacked {
            if let Some(cargo) = self.registry.get_mut(id) {
                cargo.support.grounded = true;
                cargo.support.velocity_y = 0.0;
            }
        } else {
            self.gravity
                .settle_or_snap(&mut self.registry, &self.resolver, id);
        }

        for above in affected.iter().chain(std::iter::once(&id)) {
            self.sync_object(*above);
        }
        self.persist_cargo_pose(id);
        tracing::info!("Repositioned cargo {}", id);
        Some(id)
    }
}
