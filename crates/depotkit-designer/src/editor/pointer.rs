//! Pointer routing.
//!
//! Presses start drags, moves feed whichever session is active, and clicks go
//! to aisle mode, repositioning, placement or wall drawing, in that order.

use super::WarehouseEditor;
use crate::drag::{DragEnd, DragKind, DragSession};
use crate::objects::ObjectId;
use crate::scene::{PointerRay, RayHit, Scene};

/// Modifier keys held during a pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerModifiers {
    /// Vertical mode for dragged cargo.
    pub shift: bool,
}

fn nearest_object(hits: &[RayHit]) -> Option<ObjectId> {
    hits.iter().find_map(RayHit::object)
}

impl<S: Scene> WarehouseEditor<S> {
    fn in_modal_session(&self) -> bool {
        self.aisle_editor.is_active() || self.placement.is_some() || self.reposition.is_some() || self.wall_line.is_some()
    }

    /// Pointer press. Starts dragging the nearest object under the pointer,
    /// or clears the selection when the press lands on empty floor.
    pub fn pointer_down(&mut self, ray: &PointerRay) -> Option<ObjectId> {
        if self.in_modal_session() || self.drag.is_some() {
            return None;
        }
        let hits = self.scene.raycast_from_pointer(ray);
        let Some(id) = nearest_object(&hits) else {
            self.registry.select_cargo(None);
            self.selected_part = None;
            self.selected_shelf = None;
            return None;
        };
        let grab = ray.intersect_ground()?;

        let session = DragSession::begin(&mut self.registry, id, grab, ray.screen_y)?;
        if session.kind() == DragKind::Cargo {
            self.gravity.cancel(id);
        }
        self.drag = Some(session);
        Some(id)
    }

    /// Pointer move.
    pub fn pointer_move(&mut self, ray: &PointerRay, modifiers: PointerModifiers) {
        if self.aisle_editor.is_active() {
            if let Some(ground) = ray.intersect_ground() {
                self.aisle_editor.handle_pointer_move(ground);
                self.sync_aisle_overlay();
            }
            return;
        }
        if self.reposition.is_some() {
            self.update_reposition(ray);
            return;
        }
        if self.placement.is_some() {
            self.update_placement(ray);
            return;
        }

        let ctx = self.drag_context();
        let camera = self.scene.camera_state();
        let Some(ground) = ray.intersect_ground() else {
            return;
        };
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        if drag
            .update(&mut self.registry, &ctx, ground, ray.screen_y, modifiers.shift, &camera)
            .is_none()
        {
            return;
        }
        let target = drag.target();
        let carried = drag.carried();
        self.sync_object(target);
        for id in carried {
            self.sync_object(id);
        }
    }

    /// Pointer release. Ends the active drag and settles what it moved.
    pub fn pointer_up(&mut self) -> Option<DragEnd> {
        let drag = self.drag.take()?;
        let end = drag.end(&mut self.registry);
        match &end {
            DragEnd::Moved {
                id,
                kind: DragKind::Cargo,
                from,
                ..
            } => {
                let affected = self.cascade.propagate_fall(
                    &mut self.registry,
                    &self.resolver,
                    &mut self.gravity,
                    *id,
                    Some(*from),
                );
                self.gravity
                    .settle_or_snap(&mut self.registry, &self.resolver, *id);
                for above in &affected {
                    self.sync_object(*above);
                }
                self.sync_object(*id);
                self.persist_cargo_pose(*id);
            }
            DragEnd::Moved {
                kind: DragKind::Shelf,
                carried,
                ..
            } => {
                for cargo in carried {
                    self.sync_object(*cargo);
                    self.persist_cargo_pose(*cargo);
                }
            }
            DragEnd::Moved { .. } => {}
            DragEnd::Clicked { id, kind } => match kind {
                DragKind::Cargo => {
                    self.registry.select_cargo(Some(*id));
                    self.gravity
                        .settle_or_snap(&mut self.registry, &self.resolver, *id);
                    self.sync_object(*id);
                }
                DragKind::Shelf => {
                    self.selected_shelf = Some(*id);
                    self.selected_part = None;
                }
                DragKind::Part => {
                    self.selected_part = Some(*id);
                    self.selected_shelf = None;
                }
            },
        }
        Some(end)
    }

    /// Primary click. Returns whether an active session consumed it.
    pub fn click(&mut self, ray: &PointerRay) -> bool {
        if self.aisle_editor.is_active() {
            if let Some(ground) = ray.intersect_ground() {
                self.aisle_primary_click(ground);
            }
            return true;
        }
        if self.reposition.is_some() {
            self.commit_reposition(ray);
            return true;
        }
        if self.placement.is_some() {
            self.commit_placement(ray);
            return true;
        }
        if self.wall_line.is_some() {
            if let Some(ground) = ray.intersect_ground() {
                self.wall_line_click(ground);
            }
            return true;
        }
        false
    }

    /// Secondary click. Deletes aisle vertices in aisle mode and cancels
    /// any other session.
    pub fn secondary_click(&mut self, ray: &PointerRay) -> bool {
        if self.aisle_editor.is_active() {
            if let Some(ground) = ray.intersect_ground() {
                self.aisle_secondary_click(ground);
            }
            return true;
        }
        if self.cancel_reposition() {
            return true;
        }
        if self.placement.is_some() {
            self.end_placement();
            return true;
        }
        if self.wall_line.is_some() {
            self.exit_wall_line_mode();
            return true;
        }
        false
    }

    /// Double click on cargo starts repositioning it.
    pub fn double_click(&mut self, ray: &PointerRay) -> bool {
        if self.in_modal_session() {
            return false;
        }
        if let Some(drag) = self.drag.take() {
            drag.cancel(&mut self.registry);
        }
        let hits = self.scene.raycast_from_pointer(ray);
        let Some(id) = nearest_object(&hits).filter(|id| self.registry.get(*id).is_some_and(|o| o.is_cargo())) else {
            return false;
        };
        self.registry.select_cargo(Some(id));
        self.begin_reposition(id)
    }
}
