//! Undo/redo timeline of full drawing-state snapshots.

use crate::state::DrawingState;
use serde::{Deserialize, Serialize};

/// History limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Maximum number of snapshots kept, including the empty root.
    /// `None` keeps everything. Values below 2 are treated as 2.
    #[serde(default)]
    pub max_snapshots: Option<usize>,
}

/// Linear snapshot timeline with a cursor.
///
/// `snapshots[0]` is always the empty state and is never evicted, and
/// `snapshots[cursor]` is always the displayed state. Every commit drops the
/// snapshots after the cursor before appending.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<DrawingState>,
    cursor: usize,
    config: HistoryConfig,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create a timeline holding only the empty root snapshot.
    pub fn new() -> Self {
        Self::with_config(HistoryConfig::default())
    }

    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            snapshots: vec![DrawingState::default()],
            cursor: 0,
            config,
        }
    }

    /// Append a new snapshot, discarding any redo branch.
    pub fn commit(&mut self, state: DrawingState) -> &DrawingState {
        let discarded = self.snapshots.len() - (self.cursor + 1);
        if discarded > 0 {
            log::debug!("Discarding {} redo snapshot(s)", discarded);
        }
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(state);
        self.cursor = self.snapshots.len() - 1;
        self.enforce_limit();
        self.current()
    }

    /// Commit the empty state. This is itself undoable.
    pub fn clear(&mut self) -> &DrawingState {
        self.commit(DrawingState::default())
    }

    /// Step back one snapshot. Returns `None` (and does nothing) at the root.
    pub fn undo(&mut self) -> Option<&DrawingState> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    /// Step forward one snapshot. Returns `None` (and does nothing) at the tip.
    pub fn redo(&mut self) -> Option<&DrawingState> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// The currently displayed snapshot.
    pub fn current(&self) -> &DrawingState {
        &self.snapshots[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn snapshots(&self) -> &[DrawingState] {
        &self.snapshots
    }

    /// Number of snapshots, including the root. Never zero.
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    pub fn config(&self) -> HistoryConfig {
        self.config
    }

    /// Evict the oldest non-root snapshots until the cap holds.
    fn enforce_limit(&mut self) {
        let Some(max) = self.config.max_snapshots else {
            return;
        };
        let max = max.max(2);
        while self.snapshots.len() > max && self.cursor > 1 {
            self.snapshots.remove(1);
            self.cursor -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{SerializableColor, Shape, ShapeKind, Stroke, StrokePoint, StrokeTool};
    use kurbo::Point;

    fn stroke(x: f64) -> Stroke {
        Stroke::new(
            vec![StrokePoint::new(Point::new(x, x))],
            SerializableColor::black(),
            3.0,
            StrokeTool::Pen,
        )
        .unwrap()
    }

    fn shape() -> Shape {
        Shape::new(
            ShapeKind::Rectangle,
            Point::ZERO,
            Point::new(20.0, 20.0),
            SerializableColor::black(),
            3.0,
        )
        .unwrap()
    }

    #[test]
    fn test_starts_with_empty_root() {
        let history = History::new();
        assert_eq!(history.snapshot_count(), 1);
        assert_eq!(history.cursor(), 0);
        assert!(history.current().is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_n_commits_give_n_plus_one_snapshots() {
        let mut history = History::new();
        for n in 1..=5 {
            let next = history.current().with_record(stroke(n as f64).into());
            history.commit(next);
            assert_eq!(history.snapshot_count(), n + 1);
            assert_eq!(history.cursor(), n);
        }
    }

    #[test]
    fn test_undo_redo_walk() {
        let mut history = History::new();
        let a = stroke(1.0);
        let with_a = history.current().with_record(a.clone().into());
        history.commit(with_a.clone());
        let with_ab = history.current().with_record(shape().into());
        history.commit(with_ab.clone());

        assert_eq!(history.undo(), Some(&with_a));
        assert_eq!(history.current().strokes, vec![a]);
        assert!(history.undo().unwrap().is_empty());
        assert!(history.undo().is_none());
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.redo(), Some(&with_a));
        assert_eq!(history.redo(), Some(&with_ab));
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_undo_then_redo_restores_equal_state() {
        let mut history = History::new();
        let next = history.current().with_record(stroke(1.0).into());
        history.commit(next);
        let before = history.current().clone();

        history.undo();
        history.redo();
        assert_eq!(history.current(), &before);
    }

    #[test]
    fn test_commit_after_undo_discards_redo_branch() {
        let mut history = History::new();
        let next = history.current().with_record(stroke(1.0).into());
        history.commit(next);
        history.undo();
        assert!(history.can_redo());

        let c = shape();
        let next = history.current().with_record(c.clone().into());
        history.commit(next);

        assert!(!history.can_redo());
        assert_eq!(history.snapshot_count(), 2);
        assert_eq!(history.cursor(), 1);
        assert!(history.snapshots()[0].is_empty());
        assert_eq!(history.current().shapes, vec![c]);
        assert!(history.current().strokes.is_empty());
    }

    #[test]
    fn test_clear_is_undoable() {
        let mut history = History::new();
        let next = history.current().with_record(stroke(1.0).into());
        history.commit(next.clone());

        assert!(history.clear().is_empty());
        assert_eq!(history.snapshot_count(), 3);
        assert_eq!(history.undo(), Some(&next));
    }

    #[test]
    fn test_cap_evicts_oldest_non_root() {
        let mut history = History::with_config(HistoryConfig {
            max_snapshots: Some(3),
        });
        let mut states = Vec::new();
        for n in 0..4 {
            let next = history.current().with_record(stroke(n as f64).into());
            states.push(next.clone());
            history.commit(next);
        }

        assert_eq!(history.snapshot_count(), 3);
        assert_eq!(history.cursor(), 2);
        assert!(history.snapshots()[0].is_empty());
        assert_eq!(history.snapshots()[1], states[2]);
        assert_eq!(history.current(), &states[3]);
    }

    #[test]
    fn test_tiny_cap_keeps_root_and_current() {
        let mut history = History::with_config(HistoryConfig {
            max_snapshots: Some(0),
        });
        let next = history.current().with_record(stroke(1.0).into());
        history.commit(next);
        let next = history.current().with_record(stroke(2.0).into());
        history.commit(next.clone());

        assert_eq!(history.snapshot_count(), 2);
        assert!(history.snapshots()[0].is_empty());
        assert_eq!(history.current(), &next);
        assert!(history.undo().unwrap().is_empty());
    }
}
