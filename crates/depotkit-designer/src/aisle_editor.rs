//! Aisle drawing session.
//!
//! Wraps the [`PathGraph`] with the interaction state of aisle mode: hovered
//! and selected vertices, the rubber-band end under the pointer, the last
//! user hint, and the enter/exit lifecycle that turns paths into aisles.

use crate::aisle::{width_outline, Aisle, WidthOutline};
use crate::path_graph::{ClickOutcome, DrawHint, PathGraph, PointHit};
use depotkit_core::Point2D;
use depotkit_settings::AisleSettings;
use std::collections::HashSet;

/// Result of a secondary (right) click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SecondaryOutcome {
    /// The active drawing was cancelled.
    Cancelled,
    /// The nearest vertex was deleted.
    Deleted(PointHit),
    /// Nothing changed.
    Rejected(DrawHint),
}

/// Result of pressing Escape in aisle mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeOutcome {
    /// The active drawing was cancelled; the session stays open.
    CancelledDrawing,
    /// Nothing was being drawn; the caller should finish the session.
    ExitRequested,
}

/// Display state of a vertex marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    Normal,
    Hovered,
    Selected,
}

/// One vertex marker of the preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexMarker {
    pub point: Point2D,
    pub state: MarkerState,
}

/// Everything needed to draw aisle mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AislePreview {
    /// Centre lines of every path.
    pub lines: Vec<Vec<Point2D>>,
    /// Dashed edges at half the aisle width.
    pub outlines: Vec<WidthOutline>,
    /// Vertex markers, one per distinct location.
    pub markers: Vec<VertexMarker>,
    /// Ring drawn around the drawing anchor.
    pub anchor: Option<Point2D>,
    /// Dashed line from the anchor to the pointer.
    pub rubber_band: Option<(Point2D, Point2D)>,
    pub width: f64,
}

/// Aisle mode session.
#[derive(Debug, Clone)]
pub struct AisleEditor {
    graph: PathGraph,
    active: bool,
    width: f64,
    delete_radius: f64,
    hovered: Option<PointHit>,
    selected: Option<PointHit>,
    pointer: Option<Point2D>,
    hint: Option<DrawHint>,
}

impl AisleEditor {
    pub fn new(settings: &AisleSettings) -> Self {
        Self {
            graph: PathGraph::new(settings.hit_radius(), settings.history_capacity),
            active: false,
            width: settings.default_width,
            delete_radius: settings.delete_radius,
            hovered: None,
            selected: None,
            pointer: None,
            hint: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn graph(&self) -> &PathGraph {
        &self.graph
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Sets the width given to aisles on exit. Non-positive values are ignored.
    pub fn set_width(&mut self, width: f64) {
        if width > 0.0 {
            self.width = width;
        }
    }

    pub fn hovered(&self) -> Option<PointHit> {
        self.hovered
    }

    pub fn selected(&self) -> Option<PointHit> {
        self.selected
    }

    /// Most recent hint for the user, if the last action was rejected.
    pub fn last_hint(&self) -> Option<DrawHint> {
        self.hint
    }

    /// Opens the session on the centre lines of the committed aisles.
    pub fn enter(&mut self, aisles: &[Aisle]) {
        self.graph
            .begin_session(aisles.iter().map(|a| a.path.clone()));
        self.active = true;
        self.clear_interaction();
        tracing::info!("Entered aisle mode with {} path(s)", self.graph.path_count());
    }

    /// Closes the session.
    ///
    /// Returns the new aisle set, or `None` when there are no paths, in which
    /// case the previously committed aisles stay as they were.
    pub fn finish(&mut self) -> Option<Vec<Aisle>> {
        if !self.active {
            return None;
        }
        self.active = false;
        self.clear_interaction();

        let aisles: Vec<Aisle> = self
            .graph
            .paths()
            .iter()
            .filter(|p| p.len() >= 2)
            .map(|p| Aisle::new(p.clone(), self.width))
            .collect();
        self.graph.begin_session(Vec::new());

        tracing::info!("Left aisle mode with {} aisle(s)", aisles.len());
        if aisles.is_empty() {
            None
        } else {
            Some(aisles)
        }
    }

    fn clear_interaction(&mut self) {
        self.hovered = None;
        self.selected = None;
        self.pointer = None;
        self.hint = None;
    }

    /// Left click: start, extend or reject.
    pub fn handle_primary_click(&mut self, click: Point2D) -> Option<ClickOutcome> {
        if !self.active {
            return None;
        }
        let outcome = self.graph.begin_or_extend(click);
        self.hint = match outcome {
            ClickOutcome::Rejected(hint) => Some(hint),
            _ => None,
        };
        if outcome.is_committed() {
            self.selected = None;
            self.hovered = self.graph.find_point_at(click.snap_to_half_grid(), self.graph.hit_radius());
        }
        Some(outcome)
    }

    /// Right click: cancel the active drawing, else delete the nearest vertex.
    pub fn handle_secondary_click(&mut self, click: Point2D) -> Option<SecondaryOutcome> {
        if !self.active {
            return None;
        }
        if self.graph.cancel_drawing() {
            self.hint = None;
            return Some(SecondaryOutcome::Cancelled);
        }

        let snapped = click.snap_to_half_grid();
        let Some(hit) = self.graph.find_nearest_point(snapped, self.delete_radius) else {
            self.hint = Some(DrawHint::NothingToDelete);
            return Some(SecondaryOutcome::Rejected(DrawHint::NothingToDelete));
        };

        self.graph.delete_point(hit.path_index, hit.point_index);
        self.graph.snapshot();
        self.hovered = None;
        self.selected = None;
        self.hint = None;
        Some(SecondaryOutcome::Deleted(hit))
    }

    /// Tracks the pointer for hover highlighting and the rubber band.
    pub fn handle_pointer_move(&mut self, pointer: Point2D) {
        if !self.active {
            return;
        }
        let snapped = pointer.snap_to_half_grid();
        self.hovered = self.graph.find_point_at(snapped, self.graph.hit_radius());
        self.pointer = Some(snapped);
    }

    /// Selects the vertex under `pointer`, if any.
    pub fn select_at(&mut self, pointer: Point2D) -> Option<PointHit> {
        if !self.active {
            return None;
        }
        self.selected = self
            .graph
            .find_point_at(pointer.snap_to_half_grid(), self.graph.hit_radius());
        self.selected
    }

    pub fn escape(&mut self) -> EscapeOutcome {
        if self.graph.cancel_drawing() {
            EscapeOutcome::CancelledDrawing
        } else {
            EscapeOutcome::ExitRequested
        }
    }

    pub fn undo(&mut self) -> bool {
        if !self.active {
            return false;
        }
        let applied = self.graph.undo();
        self.after_history_step(applied, DrawHint::NothingToUndo);
        applied
    }

    pub fn redo(&mut self) -> bool {
        if !self.active {
            return false;
        }
        let applied = self.graph.redo();
        self.after_history_step(applied, DrawHint::NothingToRedo);
        applied
    }

    fn after_history_step(&mut self, applied: bool, rejected: DrawHint) {
        self.hovered = None;
        self.selected = None;
        self.hint = if applied { None } else { Some(rejected) };
    }

    /// Deletes the selected vertex, or else the last vertex of the last path.
    pub fn delete_selected_or_last(&mut self) -> bool {
        if !self.active {
            return false;
        }
        let deleted = match self.selected.take() {
            Some(hit) => self.graph.delete_point(hit.path_index, hit.point_index),
            None => self.graph.delete_last_point(),
        };
        if deleted {
            self.graph.snapshot();
            self.hovered = None;
            self.hint = None;
        } else {
            self.hint = Some(DrawHint::NothingToDelete);
        }
        deleted
    }

    /// Removes every path.
    pub fn clear_paths(&mut self) -> bool {
        if !self.active {
            return false;
        }
        if !self.graph.clear_paths() {
            self.hint = Some(DrawHint::NothingToClear);
            return false;
        }
        self.graph.snapshot();
        self.hovered = None;
        self.selected = None;
        self.hint = None;
        true
    }

    /// Builds the current preview.
    pub fn preview(&self) -> AislePreview {
        let paths = self.graph.paths();
        let lines = paths.iter().map(|p| p.points().to_vec()).collect();
        let outlines = paths
            .iter()
            .flat_map(|p| width_outline(p, self.width))
            .collect();

        // Markers are keyed on centimetre-rounded coordinates so shared
        // endpoints are drawn once.
        let mut seen = HashSet::new();
        let mut markers = Vec::new();
        for (path_index, path) in paths.iter().enumerate() {
            for (point_index, point) in path.iter().enumerate() {
                let key = ((point.x * 100.0).round() as i64, (point.z * 100.0).round() as i64);
                if !seen.insert(key) {
                    continue;
                }
                let selected = self
                    .selected
                    .is_some_and(|s| s.path_index == path_index && s.point_index == point_index);
                let hovered = self.hovered.is_some_and(|h| h.point == *point);
                let state = if selected {
                    MarkerState::Selected
                } else if hovered {
                    MarkerState::Hovered
                } else {
                    MarkerState::Normal
                };
                markers.push(VertexMarker {
                    point: *point,
                    state,
                });
            }
        }

        let anchor = self.graph.drawing_start().map(|s| s.point);
        let rubber_band = anchor.zip(self.pointer);

        AislePreview {
            lines,
            outlines,
            markers,
            anchor,
            rubber_band,
            width: self.width,
        }
    }
}

impl Default for AisleEditor {
    fn default() -> Self {
        Self::new(&AisleSettings::default())
    }
}
