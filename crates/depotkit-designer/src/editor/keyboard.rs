use super::WarehouseEditor;
use crate::keyboard::{map_key, EditorAction, KeyContext, KeyInput};
use crate::scene::Scene;

impl<S: Scene> WarehouseEditor<S> {
    fn key_context(&self) -> KeyContext {
        KeyContext {
            aisle_mode: self.aisle_editor.is_active(),
            repositioning: self.reposition.is_some(),
            placing: self.placement.is_some() || self.wall_line.is_some(),
        }
    }

    /// Applies a key press. Returns the action it triggered.
    pub fn handle_key(&mut self, input: &KeyInput) -> Option<EditorAction> {
        let action = map_key(input, self.key_context())?;
        match action {
            EditorAction::Escape => {
                // Innermost session first.
                if !self.cancel_reposition() {
                    if self.placement.is_some() {
                        self.end_placement();
                    } else if self.wall_line.is_some() {
                        self.exit_wall_line_mode();
                    } else {
                        self.aisle_escape();
                    }
                }
            }
            EditorAction::Undo => {
                self.undo_aisle();
            }
            EditorAction::Redo => {
                self.redo_aisle();
            }
            EditorAction::Rotate => {
                self.rotate_reposition();
            }
            EditorAction::DeletePoint => {
                self.delete_aisle_point();
            }
        }
        Some(action)
    }
}
