//! Bounded snapshot history for the path graph.
//!
//! The newest entry of the undo ring is always the current state, so a fresh
//! session seeds one baseline entry and `undo` needs at least two.

use super::types::PathGraphState;
use std::collections::VecDeque;

/// Snapshot-based undo/redo manager.
#[derive(Debug, Clone)]
pub struct PathHistory {
    undo: VecDeque<PathGraphState>,
    redo: Vec<PathGraphState>,
    capacity: usize,
}

impl PathHistory {
    /// Creates an empty history holding at most `capacity` snapshots.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            undo: VecDeque::with_capacity(capacity),
            redo: Vec::new(),
            capacity,
        }
    }

    /// Records `state` as the current state and drops any redo entries.
    pub fn push(&mut self, state: PathGraphState) {
        self.undo.push_back(state);
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Drops all entries and seeds `baseline` as the only one.
    pub fn reset(&mut self, baseline: PathGraphState) {
        self.undo.clear();
        self.redo.clear();
        self.undo.push_back(baseline);
    }

    /// Steps back one snapshot, returning the state to restore.
    pub fn undo(&mut self) -> Option<&PathGraphState> {
        if self.undo.len() <= 1 {
            return None;
        }
        let current = self.undo.pop_back()?;
        self.redo.push(current);
        self.undo.back()
    }

    /// Re-applies the most recently undone snapshot.
    pub fn redo(&mut self) -> Option<&PathGraphState> {
        let next = self.redo.pop()?;
        self.undo.push_back(next);
        self.undo.back()
    }

    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of snapshots in the undo ring, including the current one.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for PathHistory {
    fn default() -> Self {
        Self::new(50)
    }
}
