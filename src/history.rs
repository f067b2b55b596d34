//! Undo/redo snapshot stack.

use crate::drawing::Drawing;
use std::collections::VecDeque;

/// Default number of snapshots kept.
pub const DEFAULT_CAPACITY: usize = 50;

/// Snapshot history with a cursor.
///
/// The stack is never empty and the cursor always points at a snapshot.
#[derive(Clone, Debug)]
pub struct History {
    /// Snapshots, oldest first.
    snapshots: VecDeque<Drawing>,
    /// Position of the snapshot matching the live drawing.
    cursor: usize,
    /// Maximum number of snapshots to keep.
    capacity: usize,
}

impl History {
    /// Create a history seeded with `initial`.
    pub fn new(initial: &Drawing) -> Self {
        Self::with_capacity(initial, DEFAULT_CAPACITY)
    }

    /// Create a history holding at most `capacity` snapshots (at least 1).
    pub fn with_capacity(initial: &Drawing, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut snapshots = VecDeque::with_capacity(capacity);
        snapshots.push_back(initial.clone());
        Self {
            snapshots,
            cursor: 0,
            capacity,
        }
    }

    /// Record `drawing` unless it equals the snapshot at the cursor.
    ///
    /// Snapshots after the cursor (the redo branch) are discarded. When the
    /// stack is full the oldest snapshot is evicted. Returns whether a
    /// snapshot was pushed.
    pub fn save(&mut self, drawing: &Drawing) -> bool {
        if self.snapshots.get(self.cursor) == Some(drawing) {
            return false;
        }
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push_back(drawing.clone());
        self.cursor = self.snapshots.len() - 1;
        if self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
            self.cursor -= 1;
        }
        true
    }

    /// Step back one snapshot, returning a copy of it.
    pub fn undo(&mut self) -> Option<Drawing> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.snapshots.get(self.cursor).cloned()
    }

    /// Step forward one snapshot, returning a copy of it.
    pub fn redo(&mut self) -> Option<Drawing> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        self.snapshots.get(self.cursor).cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> Option<&Drawing> {
        self.snapshots.get(self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::paint_pixel;

    fn painted(n: usize) -> Drawing {
        let mut d = Drawing::blank();
        for i in 0..n {
            paint_pixel(&mut d, i, "#ffffff");
        }
        d
    }

    #[test]
    fn duplicate_snapshots_are_skipped() {
        let mut h = History::new(&Drawing::blank());
        assert!(!h.save(&Drawing::blank()));
        assert!(h.save(&painted(1)));
        assert!(!h.save(&painted(1)));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn undo_redo_walk_the_stack() {
        let mut h = History::new(&painted(0));
        for n in 1..=3 {
            h.save(&painted(n));
        }
        assert_eq!(h.undo(), Some(painted(2)));
        assert_eq!(h.undo(), Some(painted(1)));
        assert_eq!(h.undo(), Some(painted(0)));
        assert_eq!(h.undo(), None);
        assert_eq!(h.redo(), Some(painted(1)));
        assert_eq!(h.redo(), Some(painted(2)));
        assert_eq!(h.redo(), Some(painted(3)));
        assert_eq!(h.redo(), None);
    }

    #[test]
    fn save_after_undo_drops_redo_branch() {
        let mut h = History::new(&painted(0));
        h.save(&painted(1));
        h.save(&painted(2));
        h.undo();
        assert!(h.save(&painted(5)));
        assert!(!h.can_redo());
        assert_eq!(h.len(), 3);
        assert_eq!(h.undo(), Some(painted(1)));
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut h = History::new(&painted(0));
        for n in 1..=60 {
            h.save(&painted(n));
            assert!(h.len() <= DEFAULT_CAPACITY);
            assert!(h.cursor() < h.len());
        }
        assert_eq!(h.len(), DEFAULT_CAPACITY);
        assert_eq!(h.cursor(), DEFAULT_CAPACITY - 1);
        while h.can_undo() {
            h.undo();
        }
        // snapshots 0..=10 were evicted
        assert_eq!(h.current(), Some(&painted(11)));
    }
}
