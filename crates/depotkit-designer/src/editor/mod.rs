//! Warehouse editor state.
//!
//! [`WarehouseEditor`] owns the object registry, the committed aisles and all
//! interaction sessions. It mirrors changes into a [`Scene`], queues backend
//! writes on a [`PersistQueue`] and advances falling objects once per
//! [`WarehouseEditor::tick`]. The operations are split across submodules by
//! area, each adding an `impl` block.

mod aisles;
mod cargo;
mod keyboard;
mod layout;
mod pointer;

pub use pointer::PointerModifiers;

use crate::aisle::Aisle;
use crate::aisle_editor::AisleEditor;
use crate::cascade::CascadeEngine;
use crate::drag::{DragContext, DragSession};
use crate::gravity::{GravityController, Landing};
use crate::objects::ObjectId;
use crate::persistence::{PendingWrite, PersistEvent, PersistOp, PersistQueue, PersistWorker};
use crate::placement::{PlacementSession, RepositionSession};
use crate::registry::ObjectRegistry;
use crate::scene::{BoxNode, Scene, SceneKey, SceneNode};
use crate::store::CargoPose;
use crate::support::SupportResolver;
use depotkit_core::Point2D;
use depotkit_settings::Config;

/// Summary of one [`WarehouseEditor::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Objects that came to rest.
    pub landings: Vec<Landing>,
    /// Backend ids attached to local cargo.
    pub attached: Vec<(ObjectId, String)>,
    /// Backend writes that failed since the last tick.
    pub failures: Vec<PersistEvent>,
}

/// Two-click wall drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WallLineMode {
    pub(crate) start: Option<Point2D>,
}

/// The warehouse editor.
pub struct WarehouseEditor<S: Scene> {
    config: Config,
    registry: ObjectRegistry,
    resolver: SupportResolver,
    cascade: CascadeEngine,
    gravity: GravityController,
    aisle_editor: AisleEditor,
    aisles: Vec<Aisle>,
    drag: Option<DragSession>,
    placement: Option<PlacementSession>,
    reposition: Option<RepositionSession>,
    wall_line: Option<WallLineMode>,
    selected_part: Option<ObjectId>,
    selected_shelf: Option<ObjectId>,
    persist: PersistQueue,
    scene: S,
}

impl<S: Scene> WarehouseEditor<S> {
    /// Creates an editor and the worker that performs its backend writes.
    ///
    /// The worker must be run (see [`PersistWorker::spawn`]) for writes to
    /// reach the store.
    pub fn new(config: Config, scene: S) -> (Self, PersistWorker) {
        let (persist, worker) = PersistQueue::new();
        let editor = Self {
            resolver: SupportResolver::new(&config.physics),
            cascade: CascadeEngine::new(&config.physics),
            gravity: GravityController::new(&config.physics),
            aisle_editor: AisleEditor::new(&config.aisle),
            config,
            registry: ObjectRegistry::new(),
            aisles: Vec::new(),
            drag: None,
            placement: None,
            reposition: None,
            wall_line: None,
            selected_part: None,
            selected_shelf: None,
            persist,
            scene,
        };
        (editor, worker)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &SupportResolver {
        &self.resolver
    }

    pub fn gravity(&self) -> &GravityController {
        &self.gravity
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn aisles(&self) -> &[Aisle] {
        &self.aisles
    }

    pub fn aisle_editor(&self) -> &AisleEditor {
        &self.aisle_editor
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_placing(&self) -> bool {
        self.placement.is_some()
    }

    pub fn is_repositioning(&self) -> bool {
        self.reposition.is_some()
    }

    pub fn is_drawing_walls(&self) -> bool {
        self.wall_line.is_some()
    }

    pub fn selected_part(&self) -> Option<ObjectId> {
        self.selected_part
    }

    pub fn selected_shelf(&self) -> Option<ObjectId> {
        self.selected_shelf
    }

    pub(crate) fn drag_context(&self) -> DragContext {
        DragContext::from_config(&self.config)
    }

    /// Advances falling objects by one step and applies backend completions.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();

        for event in self.persist.drain_events() {
            match event {
                PersistEvent::CargoCreated { local, db_id, pose } => {
                    match self.registry.get_mut(local).and_then(|o| o.cargo_info_mut()) {
                        Some(info) => {
                            info.db_id = Some(db_id.clone());
                            report.attached.push((local, db_id));
                            // Moved or landed while the create was in flight.
                            if self.cargo_pose(local).is_some_and(|current| current != pose) {
                                self.persist_cargo_pose(local);
                            }
                        }
                        None => {
                            // Deleted before the backend answered.
                            tracing::debug!("Cargo {} is gone, deleting record {}", local, db_id);
                            self.persist.submit(PersistOp::DeleteCargo { db_id });
                        }
                    }
                }
                failure @ PersistEvent::Failed { .. } => report.failures.push(failure),
            }
        }

        let falling: Vec<ObjectId> = self
            .registry
            .iter()
            .filter(|o| self.gravity.is_falling(o.id))
            .map(|o| o.id)
            .collect();
        let landings = self
            .gravity
            .tick(&mut self.registry, &self.resolver, &self.cascade);

        for id in falling {
            self.sync_object(id);
        }
        for landing in &landings {
            self.sync_object(landing.id);
            self.persist_cargo_pose(landing.id);
        }
        report.landings = landings;
        report
    }

    /// Ticks until nothing falls or `max_ticks` have run.
    pub fn run_until_settled(&mut self, max_ticks: usize) -> Vec<Landing> {
        let mut landings = Vec::new();
        for _ in 0..max_ticks {
            if self.gravity.is_idle() {
                break;
            }
            landings.extend(self.tick().landings);
        }
        landings
    }

    /// Mirrors an object's current transform into the scene.
    pub(crate) fn sync_object(&mut self, id: ObjectId) {
        match self.registry.get(id) {
            Some(object) => {
                let node = SceneNode::Box(BoxNode::from_object(object));
                self.scene.add_object(SceneKey::Object(id), node);
            }
            None => self.scene.remove_object(SceneKey::Object(id)),
        }
    }

    /// Queues a position update for cargo with a backend id.
    fn cargo_pose(&self, id: ObjectId) -> Option<CargoPose> {
        let object = self.registry.get(id).filter(|o| o.is_cargo())?;
        Some(CargoPose::new(object.position.x, object.bottom(), object.position.z, object.rotation))
    }

    pub(crate) fn persist_cargo_pose(&mut self, id: ObjectId) -> Option<PendingWrite> {
        let db_id = self.registry.get(id)?.db_id()?.to_string();
        let pose = self.cargo_pose(id)?;
        Some(self.persist.submit(PersistOp::UpdateCargoPosition { db_id, pose }))
    }

    pub(crate) fn submit(&self, op: PersistOp) -> PendingWrite {
        self.persist.submit(op)
    }
}
