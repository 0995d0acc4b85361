//! Aisle mode and the committed aisle set.

use super::WarehouseEditor;
use crate::aisle::{aisles_from_records, Aisle, AisleRecord};
use crate::aisle_editor::{AislePreview, EscapeOutcome, SecondaryOutcome};
use crate::path_graph::ClickOutcome;
use crate::persistence::{PendingWrite, PersistOp};
use crate::scene::{Scene, SceneKey, SceneNode};
use depotkit_core::Point2D;

impl<S: Scene> WarehouseEditor<S> {
    pub fn is_aisle_mode(&self) -> bool {
        self.aisle_editor.is_active()
    }

    /// Opens aisle mode on the current aisles. Other sessions are cancelled.
    pub fn enter_aisle_mode(&mut self) {
        if self.aisle_editor.is_active() {
            return;
        }
        if let Some(drag) = self.drag.take() {
            drag.cancel(&mut self.registry);
        }
        self.cancel_reposition();
        self.end_placement();
        self.exit_wall_line_mode();

        self.aisle_editor.enter(&self.aisles);
        self.sync_aisle_overlay();
    }

    /// Leaves aisle mode and saves the aisle configuration.
    ///
    /// With no paths left the committed aisles are kept as they were; they
    /// are saved either way.
    pub fn exit_aisle_mode(&mut self) -> Option<PendingWrite> {
        if !self.aisle_editor.is_active() {
            return None;
        }
        if let Some(aisles) = self.aisle_editor.finish() {
            self.replace_aisles(aisles);
        }
        self.scene.remove_object(SceneKey::AisleOverlay);
        Some(self.save_aisles())
    }

    pub fn aisle_primary_click(&mut self, point: Point2D) -> Option<ClickOutcome> {
        let outcome = self.aisle_editor.handle_primary_click(point)?;
        if let ClickOutcome::Rejected(hint) = outcome {
            tracing::debug!("Aisle click rejected: {}", hint);
        }
        self.sync_aisle_overlay();
        Some(outcome)
    }

    pub fn aisle_secondary_click(&mut self, point: Point2D) -> Option<SecondaryOutcome> {
        let outcome = self.aisle_editor.handle_secondary_click(point)?;
        self.sync_aisle_overlay();
        Some(outcome)
    }

    /// Escape in aisle mode: cancels the drawing, or leaves the mode when
    /// nothing is being drawn.
    pub fn aisle_escape(&mut self) -> Option<EscapeOutcome> {
        if !self.aisle_editor.is_active() {
            return None;
        }
        let outcome = self.aisle_editor.escape();
        match outcome {
            EscapeOutcome::CancelledDrawing => self.sync_aisle_overlay(),
            EscapeOutcome::ExitRequested => {
                self.exit_aisle_mode();
            }
        }
        Some(outcome)
    }

    pub fn undo_aisle(&mut self) -> bool {
        let applied = self.aisle_editor.undo();
        self.sync_aisle_overlay();
        applied
    }

    pub fn redo_aisle(&mut self) -> bool {
        let applied = self.aisle_editor.redo();
        self.sync_aisle_overlay();
        applied
    }

    pub fn delete_aisle_point(&mut self) -> bool {
        let deleted = self.aisle_editor.delete_selected_or_last();
        self.sync_aisle_overlay();
        deleted
    }

    pub fn clear_aisle_paths(&mut self) -> bool {
        let cleared = self.aisle_editor.clear_paths();
        self.sync_aisle_overlay();
        cleared
    }

    pub fn set_aisle_width(&mut self, width: f64) {
        self.aisle_editor.set_width(width);
        self.sync_aisle_overlay();
    }

    /// Removes a committed aisle outside aisle mode and saves the rest.
    pub fn delete_aisle(&mut self, index: usize) -> Option<PendingWrite> {
        if self.aisle_editor.is_active() || index >= self.aisles.len() {
            return None;
        }
        let mut aisles = self.aisles.clone();
        aisles.remove(index);
        self.replace_aisles(aisles);
        tracing::info!("Deleted aisle {}", index);
        Some(self.save_aisles())
    }

    /// Replaces the committed aisles with loaded records without saving.
    pub fn set_aisles_from_records(&mut self, records: &[AisleRecord]) {
        let aisles = aisles_from_records(records);
        self.replace_aisles(aisles);
    }

    /// Preview of the open aisle session.
    pub fn aisle_preview(&self) -> Option<AislePreview> {
        self.aisle_editor
            .is_active()
            .then(|| self.aisle_editor.preview())
    }

    pub(crate) fn replace_aisles(&mut self, aisles: Vec<Aisle>) {
        for index in 0..self.aisles.len() {
            self.scene.remove_object(SceneKey::Aisle(index));
        }
        self.aisles = aisles;
        for (index, aisle) in self.aisles.iter().enumerate() {
            self.scene
                .add_object(SceneKey::Aisle(index), SceneNode::Aisle(aisle.geometry()));
        }
    }

    fn save_aisles(&self) -> PendingWrite {
        let aisles = self.aisles.iter().map(Aisle::to_record).collect();
        self.submit(PersistOp::SaveAisleConfig { aisles })
    }

    pub(crate) fn sync_aisle_overlay(&mut self) {
        match self.aisle_preview() {
            Some(preview) => self
                .scene
                .add_object(SceneKey::AisleOverlay, SceneNode::AisleOverlay(preview)),
            None => self.scene.remove_object(SceneKey::AisleOverlay),
        }
    }
}
