//! # History log
//!
//! Bounded undo/redo over full tree snapshots.
//!
//! ## Design
//!
//! - Every committed mutation records the tree *as it was before* the
//!   mutation, never after
//! - Undo swaps the current tree with the top of the undo stack; redo
//!   replays the stored successor state, not a recomputation
//! - A new commit clears the redo stack (branching history is not
//!   supported)
//! - Both stacks are capped; the oldest snapshot is discarded first
//!
//! Snapshots are owned deep copies: once pushed, no later in-place
//! mutation of the live tree can corrupt them.

use pagecraft_model::Block;

/// A fully independent deep copy of the page tree.
pub type Snapshot = Vec<Block>;

/// Undo/redo stacks for an editing session.
#[derive(Debug)]
pub struct HistoryLog {
    /// Snapshots preceding each committed mutation (most recent last).
    undo_stack: Vec<Snapshot>,

    /// Snapshots undone from the current timeline (most recent last).
    redo_stack: Vec<Snapshot>,

    /// Maximum number of levels per stack (0 = unlimited).
    max_levels: usize,
}

impl HistoryLog {
    /// Create a history log with the default cap (100 levels).
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Record the pre-mutation tree. Invalidates any redo branch.
    pub fn commit(&mut self, prior: Snapshot) {
        self.undo_stack.push(prior);
        Self::trim(&mut self.undo_stack, self.max_levels);
        self.redo_stack.clear();
    }

    /// Step back one committed mutation. Returns `false` when there is
    /// nothing to undo.
    pub fn undo(&mut self, current: &mut Snapshot) -> bool {
        match self.undo_stack.pop() {
            Some(prior) => {
                let undone = std::mem::replace(current, prior);
                self.redo_stack.push(undone);
                Self::trim(&mut self.redo_stack, self.max_levels);
                true
            }
            None => false,
        }
    }

    /// Step forward one undone mutation. Returns `false` when there is
    /// nothing to redo.
    pub fn redo(&mut self, current: &mut Snapshot) -> bool {
        match self.redo_stack.pop() {
            Some(successor) => {
                let prior = std::mem::replace(current, successor);
                self.undo_stack.push(prior);
                Self::trim(&mut self.undo_stack, self.max_levels);
                true
            }
            None => false,
        }
    }

    fn trim(stack: &mut Vec<Snapshot>, max_levels: usize) {
        if max_levels > 0 && stack.len() > max_levels {
            stack.remove(0);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Oldest snapshot still reachable by undoing, for eviction checks.
    pub fn oldest(&self) -> Option<&Snapshot> {
        self.undo_stack.first()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_model::Payload;

    fn tree(label: &str) -> Snapshot {
        vec![Block {
            id: label.to_string(),
            payload: Payload::Text {
                text: label.to_string(),
            },
            style: None,
            visibility: None,
        }]
    }

    #[test]
    fn test_empty_log_is_inert() {
        let mut log = HistoryLog::new();
        let mut current = tree("v0");

        assert!(!log.can_undo());
        assert!(!log.can_redo());
        assert!(!log.undo(&mut current));
        assert!(!log.redo(&mut current));
        assert_eq!(current, tree("v0"));
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut log = HistoryLog::new();
        let mut current = tree("v0");

        for version in 1..=3 {
            log.commit(current.clone());
            current = tree(&format!("v{}", version));
        }
        assert_eq!(log.undo_levels(), 3);

        for _ in 0..3 {
            assert!(log.undo(&mut current));
        }
        assert_eq!(current, tree("v0"));
        assert_eq!(log.redo_levels(), 3);

        for _ in 0..3 {
            assert!(log.redo(&mut current));
        }
        assert_eq!(current, tree("v3"));
        assert_eq!(log.redo_levels(), 0);
    }

    #[test]
    fn test_commit_clears_redo() {
        let mut log = HistoryLog::new();
        let mut current = tree("v0");

        log.commit(current.clone());
        current = tree("v1");
        log.undo(&mut current);
        assert_eq!(log.redo_levels(), 1);

        log.commit(current.clone());
        assert_eq!(log.redo_levels(), 0);
    }

    #[test]
    fn test_cap_evicts_oldest_first() {
        let mut log = HistoryLog::with_max_levels(2);
        let mut current = tree("v0");

        for version in 1..=4 {
            log.commit(current.clone());
            current = tree(&format!("v{}", version));
        }

        assert_eq!(log.undo_levels(), 2);
        // v0 and v1 were evicted; the oldest reachable snapshot is v2.
        assert_eq!(log.oldest(), Some(&tree("v2")));
    }
}
