//! Path graph engine for aisle drawing.
//!
//! Maintains the set of polylines being edited: incremental segment drawing on
//! a half-unit grid, endpoint attachment and merging, vertex deletion with
//! path splitting, and snapshot-based undo/redo.
//!
//! None of the operations fail. Out-of-range indices are no-ops and
//! degenerate clicks come back as a [`DrawHint`].

mod history;
mod types;

pub use history::PathHistory;
pub use types::{ClickOutcome, DrawHint, DrawingStart, Path, PathGraphState, PointHit};

use depotkit_core::{Point2D, VERTEX_EPSILON};

/// Default radius within which a click adopts an existing vertex.
pub const DEFAULT_HIT_RADIUS: f64 = 0.8;

/// Default radius for nearest-vertex lookups.
pub const DEFAULT_NEAREST_RADIUS: f64 = 2.0;

/// Default number of undo snapshots.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Editable set of aisle centre lines.
#[derive(Debug, Clone)]
pub struct PathGraph {
    paths: Vec<Path>,
    drawing_start: Option<DrawingStart>,
    history: PathHistory,
    hit_radius: f64,
}

impl PathGraph {
    /// Creates an empty graph seeded with one baseline snapshot.
    pub fn new(hit_radius: f64, history_capacity: usize) -> Self {
        let mut graph = Self {
            paths: Vec::new(),
            drawing_start: None,
            history: PathHistory::new(history_capacity),
            hit_radius,
        };
        graph.history.reset(graph.state());
        graph
    }

    /// Replaces the graph contents and restarts history from them.
    ///
    /// Paths with fewer than two points are dropped.
    pub fn begin_session(&mut self, paths: impl IntoIterator<Item = Path>) {
        self.paths = paths.into_iter().filter(|p| p.len() >= 2).collect();
        self.drawing_start = None;
        self.history.reset(self.state());
        tracing::debug!("Path session started with {} path(s)", self.paths.len());
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    pub fn drawing_start(&self) -> Option<DrawingStart> {
        self.drawing_start
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing_start.is_some()
    }

    pub fn hit_radius(&self) -> f64 {
        self.hit_radius
    }

    pub fn history(&self) -> &PathHistory {
        &self.history
    }

    /// Deep copy of the current state.
    pub fn state(&self) -> PathGraphState {
        PathGraphState {
            paths: self.paths.clone(),
            drawing_start: self.drawing_start,
        }
    }

    fn restore(&mut self, state: &PathGraphState) {
        self.paths = state.paths.clone();
        self.drawing_start = state.drawing_start;
    }

    /// Snaps a click to the grid, preferring an existing vertex nearby.
    ///
    /// Returns the resolved point and whether it was an existing vertex.
    pub fn resolve_click(&self, click: Point2D) -> (Point2D, bool) {
        let snapped = click.snap_to_half_grid();
        match self.find_point_at(snapped, self.hit_radius) {
            Some(hit) => (hit.point, true),
            None => (snapped, false),
        }
    }

    /// Handles a primary click while drawing.
    ///
    /// The first click sets the drawing anchor. Each later click commits a
    /// segment from the anchor to the resolved point, records a snapshot and
    /// continues the chain from the new end point.
    pub fn begin_or_extend(&mut self, click: Point2D) -> ClickOutcome {
        let (point, from_existing) = self.resolve_click(click);

        let Some(start) = self.drawing_start else {
            let anchor = DrawingStart::new(point, from_existing);
            self.drawing_start = Some(anchor);
            tracing::debug!("Drawing started at {}", point);
            return ClickOutcome::Started(anchor);
        };

        if point.approx_eq(&start.point, VERTEX_EPSILON) {
            return ClickOutcome::Rejected(DrawHint::SameStartAndEnd);
        }

        self.add_segment(start.point, point);
        self.snapshot();
        self.drawing_start = Some(DrawingStart::new(point, true));

        ClickOutcome::Committed {
            start: start.point,
            end: point,
        }
    }

    /// Adds the segment `start`-`end`, attaching it to the first path whose
    /// endpoint matches, then merges paths that now touch.
    ///
    /// Returns false for a zero-length segment.
    pub fn add_segment(&mut self, start: Point2D, end: Point2D) -> bool {
        if start.same_vertex(&end) {
            return false;
        }

        let mut attached = false;
        for path in self.paths.iter_mut() {
            let (Some(first), Some(last)) = (path.first(), path.last()) else {
                continue;
            };

            if last.same_vertex(&start) {
                path.push(end);
            } else if first.same_vertex(&start) {
                path.prepend(end);
            } else if last.same_vertex(&end) {
                path.push(start);
            } else if first.same_vertex(&end) {
                path.prepend(start);
            } else {
                continue;
            }
            attached = true;
            break;
        }

        if !attached {
            self.paths.push(Path::segment(start, end));
        }

        let merges = self.merge_paths();
        tracing::debug!(
            "Segment {} -> {} added (attached: {}, merges: {})",
            start,
            end,
            attached,
            merges
        );
        true
    }

    /// Joins paths whose endpoints coincide until no pair touches.
    ///
    /// Returns the number of merges performed.
    pub fn merge_paths(&mut self) -> usize {
        let mut merges = 0;
        while let Some((i, j, merged)) = self.find_merge() {
            self.paths[i] = merged;
            self.paths.remove(j);
            merges += 1;
        }
        merges
    }

    fn find_merge(&self) -> Option<(usize, usize, Path)> {
        for i in 0..self.paths.len() {
            for j in (i + 1)..self.paths.len() {
                if let Some(merged) = join_paths(&self.paths[i], &self.paths[j]) {
                    return Some((i, j, merged));
                }
            }
        }
        None
    }

    /// Removes a vertex.
    ///
    /// A path of two points is removed entirely. An endpoint is spliced out.
    /// An interior vertex splits the path; each side is kept only if it still
    /// has two points. Returns false for an invalid index.
    pub fn delete_point(&mut self, path_index: usize, point_index: usize) -> bool {
        let Some(path) = self.paths.get_mut(path_index) else {
            return false;
        };
        if point_index >= path.len() {
            return false;
        }

        if path.len() <= 2 {
            self.paths.remove(path_index);
        } else if point_index == 0 || point_index == path.len() - 1 {
            path.remove(point_index);
        } else {
            let removed = self.paths.remove(path_index).into_points();
            let before = &removed[..point_index];
            let after = &removed[point_index + 1..];
            if before.len() >= 2 {
                self.paths.push(Path::new(before.to_vec()));
            }
            if after.len() >= 2 {
                self.paths.push(Path::new(after.to_vec()));
            }
        }

        tracing::debug!("Deleted point {} of path {}", point_index, path_index);
        true
    }

    /// Deletes the last vertex of the last path.
    pub fn delete_last_point(&mut self) -> bool {
        let Some(path_index) = self.paths.len().checked_sub(1) else {
            return false;
        };
        let point_index = self.paths[path_index].len().saturating_sub(1);
        self.delete_point(path_index, point_index)
    }

    /// First vertex, in scan order, strictly closer than `radius`.
    pub fn find_point_at(&self, p: Point2D, radius: f64) -> Option<PointHit> {
        self.vertices(p).find(|hit| hit.distance < radius)
    }

    /// Closest vertex strictly within `max_radius`; earlier vertices win ties.
    pub fn find_nearest_point(&self, p: Point2D, max_radius: f64) -> Option<PointHit> {
        self.vertices(p)
            .filter(|hit| hit.distance < max_radius)
            .fold(None, |best: Option<PointHit>, hit| match best {
                Some(b) if b.distance <= hit.distance => Some(b),
                _ => Some(hit),
            })
    }

    fn vertices(&self, p: Point2D) -> impl Iterator<Item = PointHit> + '_ {
        self.paths.iter().enumerate().flat_map(move |(path_index, path)| {
            path.iter()
                .enumerate()
                .map(move |(point_index, point)| PointHit {
                    path_index,
                    point_index,
                    point: *point,
                    distance: point.distance_to(&p),
                })
        })
    }

    /// Drops the drawing anchor. Returns false if nothing was being drawn.
    pub fn cancel_drawing(&mut self) -> bool {
        self.drawing_start.take().is_some()
    }

    /// Removes every path and the drawing anchor. Returns false if there were
    /// no paths.
    pub fn clear_paths(&mut self) -> bool {
        if self.paths.is_empty() {
            return false;
        }
        self.paths.clear();
        self.drawing_start = None;
        true
    }

    /// Records the current state in history and clears the redo stack.
    pub fn snapshot(&mut self) {
        let state = self.state();
        self.history.push(state);
    }

    /// Restores the previous snapshot. Returns false at the history floor.
    pub fn undo(&mut self) -> bool {
        let Some(state) = self.history.undo().cloned() else {
            tracing::debug!("Undo rejected: history floor reached");
            return false;
        };
        self.restore(&state);
        tracing::debug!("Undo applied ({} left)", self.history.undo_depth());
        true
    }

    /// Re-applies the last undone snapshot. Returns false if there is none.
    pub fn redo(&mut self) -> bool {
        let Some(state) = self.history.redo().cloned() else {
            tracing::debug!("Redo rejected: nothing to redo");
            return false;
        };
        self.restore(&state);
        tracing::debug!("Redo applied ({} left)", self.history.redo_depth());
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

impl Default for PathGraph {
    fn default() -> Self {
        Self::new(DEFAULT_HIT_RADIUS, DEFAULT_HISTORY_CAPACITY)
    }
}

/// Concatenates two paths sharing an endpoint, or returns `None`.
///
/// Orientations are tried in a fixed order: A-last/B-first, A-last/B-last,
/// A-first/B-first, A-first/B-last. The shared vertex appears once.
fn join_paths(a: &Path, b: &Path) -> Option<Path> {
    let (a_first, a_last) = (a.first()?, a.last()?);
    let (b_first, b_last) = (b.first()?, b.last()?);
    let ap = a.points();
    let bp = b.points();

    let points: Vec<Point2D> = if a_last.same_vertex(&b_first) {
        ap.iter().chain(bp[1..].iter()).copied().collect()
    } else if a_last.same_vertex(&b_last) {
        ap.iter()
            .chain(bp[..bp.len() - 1].iter().rev())
            .copied()
            .collect()
    } else if a_first.same_vertex(&b_first) {
        bp[1..].iter().rev().chain(ap.iter()).copied().collect()
    } else if a_first.same_vertex(&b_last) {
        bp.iter().chain(ap[1..].iter()).copied().collect()
    } else {
        return None;
    };

    Some(Path::new(points))
}
