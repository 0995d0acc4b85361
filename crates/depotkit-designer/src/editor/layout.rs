//! Shelves, parts, wall drawing and layout files.

use super::{WallLineMode, WarehouseEditor};
use crate::objects::{wall_from_line, ObjectId, PartKind, PlacedObject, ShelfSpec};
use crate::scene::{Scene, SceneKey};
use crate::serialization::LayoutFile;
use depotkit_core::Point2D;

impl<S: Scene> WarehouseEditor<S> {
    /// Adds a shelf standing on the floor at `at`. The layer count defaults
    /// to the configured one.
    pub fn add_shelf(&mut self, at: Point2D, layer_count: Option<u32>) -> ObjectId {
        let spec = ShelfSpec::new(layer_count.unwrap_or(self.config.global.layer_count));
        let id = self.registry.generate_id();
        self.registry
            .insert(PlacedObject::shelf(id, format!("Shelf {}", id.0), at, spec));
        self.sync_object(id);
        tracing::info!("Added shelf {} with {} layer(s)", id, spec.layer_count);
        id
    }

    /// Removes a shelf. Cargo that stood on it falls.
    pub fn delete_shelf(&mut self, id: ObjectId) -> bool {
        if !self.registry.get(id).is_some_and(|o| o.is_shelf()) {
            return false;
        }
        if self.drag.as_ref().is_some_and(|d| d.target() == id) {
            self.drag = None;
        }
        let stranded = self.registry.cargos_on_shelf(id);
        self.registry.remove(id);
        self.scene.remove_object(SceneKey::Object(id));
        if self.selected_shelf == Some(id) {
            self.selected_shelf = None;
        }
        for cargo in &stranded {
            self.gravity.settle(&mut self.registry, &self.resolver, *cargo);
        }
        tracing::info!("Deleted shelf {} ({} cargo stranded)", id, stranded.len());
        true
    }

    /// Adds a part of its default size centred at `at`.
    pub fn add_part(&mut self, kind: PartKind, at: Point2D) -> ObjectId {
        let id = self.registry.generate_id();
        self.registry
            .insert(PlacedObject::part(id, kind.label(), kind, at, kind.default_footprint()));
        self.sync_object(id);
        tracing::info!("Added {} {}", kind, id);
        id
    }

    /// Adds a wall along `start`-`end`; `None` when the line is too short.
    pub fn add_wall_from_line(&mut self, start: Point2D, end: Point2D) -> Option<ObjectId> {
        let id = self.registry.generate_id();
        let wall = wall_from_line(id, PartKind::Wall.label(), start, end)?;
        tracing::info!("Added wall {} of length {:.2}", id, wall.footprint.width);
        self.registry.insert(wall);
        self.sync_object(id);
        Some(id)
    }

    pub fn delete_part(&mut self, id: ObjectId) -> bool {
        if !self.registry.get(id).is_some_and(|o| o.is_part()) {
            return false;
        }
        if self.drag.as_ref().is_some_and(|d| d.target() == id) {
            self.drag = None;
        }
        self.registry.remove(id);
        self.scene.remove_object(SceneKey::Object(id));
        if self.selected_part == Some(id) {
            self.selected_part = None;
        }
        true
    }

    pub fn enter_wall_line_mode(&mut self) {
        self.end_placement();
        self.cancel_reposition();
        self.wall_line = Some(WallLineMode { start: None });
    }

    pub fn exit_wall_line_mode(&mut self) {
        self.wall_line = None;
    }

    /// First click sets the start, the second places the wall and starts
    /// over.
    pub fn wall_line_click(&mut self, point: Point2D) -> Option<ObjectId> {
        let mode = self.wall_line.as_mut()?;
        match mode.start.take() {
            None => {
                mode.start = Some(point);
                None
            }
            Some(start) => self.add_wall_from_line(start, point),
        }
    }

    /// Marks every cargo for settling.
    pub fn settle_all(&mut self) -> usize {
        let ids = self.registry.cargo_ids();
        for id in &ids {
            self.gravity.settle(&mut self.registry, &self.resolver, *id);
            self.sync_object(*id);
        }
        ids.len()
    }

    /// Replaces the editor content with a layout file. Cargo in the file is
    /// settled on the next ticks.
    pub fn load_layout(&mut self, layout: &LayoutFile) {
        if let Some(drag) = self.drag.take() {
            drag.cancel(&mut self.registry);
        }
        self.reposition = None;
        self.end_placement();
        self.wall_line = None;
        self.gravity.clear();
        let stale: Vec<ObjectId> = self.registry.iter().map(|o| o.id).collect();
        for id in stale {
            self.registry.remove(id);
            self.scene.remove_object(SceneKey::Object(id));
        }
        self.selected_part = None;
        self.selected_shelf = None;

        self.config.global = layout.global.clone();
        self.config.environment = layout.environment.clone();
        let aisles = layout.restore(&mut self.registry);
        self.replace_aisles(aisles);

        let ids: Vec<ObjectId> = self.registry.iter().map(|o| o.id).collect();
        for id in ids {
            self.sync_object(id);
        }
        let cargo = self.settle_all();
        tracing::info!(
            "Loaded layout '{}': {} object(s), {} cargo, {} aisle(s)",
            layout.metadata.name,
            self.registry.len(),
            cargo,
            self.aisles.len()
        );
    }

    /// Captures the current layout.
    pub fn export_layout(&self, name: &str, include_cargo: bool) -> LayoutFile {
        LayoutFile::capture(
            name,
            &self.config.global,
            &self.config.environment,
            &self.registry,
            &self.aisles,
            include_cargo,
        )
    }
}
