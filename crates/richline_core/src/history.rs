//! Bounded snapshot undo/redo history.
//!
//! Whole-state snapshots rather than per-edit deltas: a single wrap or split
//! can touch several lines, and a clone of a line-count-proportional state is
//! simpler to get right than a diff. The cap bounds memory.

use crate::constants::DEFAULT_HISTORY_LIMIT;
use std::collections::VecDeque;

/// Past/future snapshot stacks with a capped `past`.
#[derive(Debug, Clone)]
pub struct HistoryManager<S> {
    past: VecDeque<S>,
    future: Vec<S>,
    limit: usize,
}

impl<S> Default for HistoryManager<S> {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl<S> HistoryManager<S> {
    /// Create a history keeping at most `limit` undo snapshots.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Record the state as it is before a content mutation.
    ///
    /// Evicts the oldest snapshot once `past` exceeds the limit and clears the
    /// redo stack unconditionally.
    pub fn checkpoint(&mut self, snapshot: S) {
        self.past.push_back(snapshot);
        while self.past.len() > self.limit {
            self.past.pop_front();
            tracing::trace!(limit = self.limit, "evicted oldest undo snapshot");
        }
        self.future.clear();
    }

    /// Step back one snapshot.
    ///
    /// # Arguments
    /// - `current`: Snapshot of the live state, kept for redo.
    ///
    /// # Returns
    /// The state to restore, or `None` (and no change) when `past` is empty.
    pub fn undo(&mut self, current: S) -> Option<S> {
        let previous = self.past.pop_back()?;
        self.future.push(current);
        Some(previous)
    }

    /// Step forward one snapshot; the inverse of [`Self::undo`].
    pub fn redo(&mut self, current: S) -> Option<S> {
        let next = self.future.pop()?;
        self.past.push_back(current);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Oldest snapshot still available to undo.
    pub fn oldest(&self) -> Option<&S> {
        self.past.front()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn past_is_capped_oldest_first() {
        let mut history = HistoryManager::with_limit(50);
        for step in 0..60 {
            history.checkpoint(step);
        }
        assert_eq!(history.past_len(), 50);
        assert_eq!(history.oldest(), Some(&10));
    }

    #[test]
    fn undo_and_redo_on_empty_stacks_are_noops() {
        let mut history: HistoryManager<u32> = HistoryManager::default();
        assert!(!history.can_undo());
        assert_eq!(history.undo(7), None);
        assert_eq!(history.redo(7), None);
        assert_eq!(history.future_len(), 0);
    }

    #[test]
    fn undo_then_redo_roundtrip() {
        let mut history = HistoryManager::default();
        history.checkpoint("a");
        history.checkpoint("b");
        assert_eq!(history.undo("c"), Some("b"));
        assert!(history.can_redo());
        assert_eq!(history.redo("b"), Some("c"));
        assert_eq!(history.past_len(), 2);
        assert_eq!(history.future_len(), 0);
    }

    #[test]
    fn checkpoint_clears_future() {
        let mut history = HistoryManager::default();
        history.checkpoint(1);
        assert_eq!(history.undo(2), Some(1));
        assert!(history.can_redo());
        history.checkpoint(1);
        assert!(!history.can_redo());
    }
}
