//! Snapshot-based undo/redo history.
//!
//! Every committed edit stores a full copy of the canvas. The history is a
//! linear timeline with a cursor: committing while undone truncates the redo
//! tail, and the oldest entry is evicted once the cap is reached.

use crate::canvas::Snapshot;

/// Maximum number of snapshots retained.
pub const MAX_HISTORY: usize = 50;

#[derive(Default)]
pub struct History {
    entries: Vec<Snapshot>,
    index: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything and seed the timeline with a single baseline state.
    pub fn reset(&mut self, baseline: Snapshot) {
        self.entries.clear();
        self.entries.push(baseline);
        self.index = 0;
    }

    /// Record a new state after an edit. A snapshot identical to the current
    /// cursor entry is dropped, so no-op edits never pollute the timeline.
    pub fn commit(&mut self, snapshot: Snapshot) {
        if let Some(current) = self.entries.get(self.index) {
            if *current == snapshot {
                return;
            }
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(snapshot);
        if self.entries.len() > MAX_HISTORY {
            self.entries.remove(0);
        }
        self.index = self.entries.len() - 1;
    }

    /// Step the cursor back and return the state to restore.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step the cursor forward and return the state to restore.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Surface;

    fn snap(shade: u8) -> Snapshot {
        Surface::new(4, 4, [shade, shade, shade]).snapshot()
    }

    #[test]
    fn undo_on_baseline_is_refused() {
        let mut history = History::new();
        history.reset(snap(0));
        assert!(!history.can_undo());
        assert!(history.undo().is_none());
    }

    #[test]
    fn undo_and_redo_walk_the_timeline() {
        let mut history = History::new();
        history.reset(snap(0));
        history.commit(snap(10));
        history.commit(snap(20));

        assert_eq!(history.undo().unwrap().as_raw()[0], 10);
        assert_eq!(history.undo().unwrap().as_raw()[0], 0);
        assert!(history.undo().is_none());
        assert_eq!(history.redo().unwrap().as_raw()[0], 10);
        assert_eq!(history.redo().unwrap().as_raw()[0], 20);
        assert!(history.redo().is_none());
    }

    #[test]
    fn commit_after_undo_discards_the_redo_tail() {
        let mut history = History::new();
        history.reset(snap(0));
        history.commit(snap(10));
        history.commit(snap(20));
        history.undo();
        history.commit(snap(30));

        assert!(!history.can_redo());
        assert_eq!(history.len(), 3);
        assert_eq!(history.undo().unwrap().as_raw()[0], 10);
    }

    #[test]
    fn identical_commit_is_deduplicated() {
        let mut history = History::new();
        history.reset(snap(0));
        history.commit(snap(0));
        assert_eq!(history.len(), 1);
        assert!(!history.can_undo());
    }

    #[test]
    fn oldest_entry_is_evicted_at_the_cap() {
        let mut history = History::new();
        history.reset(snap(0));
        for i in 1..=MAX_HISTORY as u8 + 5 {
            history.commit(snap(i));
        }
        assert_eq!(history.len(), MAX_HISTORY);
        // Walk all the way back: the baseline is gone, the floor moved up.
        let mut last = 0;
        while let Some(s) = history.undo() {
            last = s.as_raw()[0];
        }
        assert_eq!(last as usize, MAX_HISTORY + 5 - (MAX_HISTORY - 1));
    }
}
