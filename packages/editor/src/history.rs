//! # Undo/Redo History
//!
//! Snapshot-based history for editor state.
//!
//! ## Design
//!
//! - Each accepted mutation records the prior root as a snapshot
//! - Undo moves the present root to the future stack and restores the
//!   most recent past root; redo mirrors it
//! - New mutations clear the future stack
//! - Snapshots share unchanged subtrees, so each one costs only the path
//!   the edit copied
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut state = EditorState::default();
//! state.dispatch(&EditorAction::update_content("p-1", "Hello"))?;
//!
//! assert!(state.undo());
//! assert!(state.redo());
//! ```

use crate::state::EditorState;
use crate::tree_ops::contains_node;
use mina_model::NodeRef;
use std::sync::Arc;
use tracing::debug;

/// Past/future stacks of root snapshots
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Older roots, most recent last
    past: Vec<NodeRef>,

    /// Undone roots, most recent last
    future: Vec<NodeRef>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl History {
    /// Unbounded history
    pub fn new() -> Self {
        Self::with_max_levels(0)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            max_levels,
        }
    }

    /// Record the root that an accepted mutation replaced
    pub fn record(&mut self, snapshot: NodeRef) {
        self.past.push(snapshot);

        if self.max_levels > 0 && self.past.len() > self.max_levels {
            self.past.remove(0);
        }

        // New edits invalidate the redo branch
        self.future.clear();
    }

    /// Pop the previous root, parking `present` for redo
    pub fn step_back(&mut self, present: NodeRef) -> Option<NodeRef> {
        let previous = self.past.pop()?;
        self.future.push(present);
        Some(previous)
    }

    /// Pop the next root, parking `present` for undo
    pub fn step_forward(&mut self, present: NodeRef) -> Option<NodeRef> {
        let next = self.future.pop()?;
        self.past.push(present);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.past.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.future.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

/// State with the previous root restored, or `None` when there is nothing
/// to undo
pub fn undo(state: &EditorState) -> Option<EditorState> {
    let mut next = state.clone();
    let previous = next.history.step_back(Arc::clone(&state.container))?;
    Some(restore(next, previous, "undo"))
}

/// State with the next root restored, or `None` when there is nothing to
/// redo
pub fn redo(state: &EditorState) -> Option<EditorState> {
    let mut next = state.clone();
    let following = next.history.step_forward(Arc::clone(&state.container))?;
    Some(restore(next, following, "redo"))
}

fn restore(mut state: EditorState, root: NodeRef, direction: &'static str) -> EditorState {
    state.container = root;
    state.version += 1;

    if let Some(active) = &state.active_node_id {
        if !contains_node(&state.container, active) {
            state.active_node_id = None;
        }
    }

    debug!(
        direction,
        version = state.version,
        undo_levels = state.history.undo_levels(),
        redo_levels = state.history.redo_levels(),
        "Restored snapshot"
    );

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use mina_model::EditorNode;

    fn snapshot(id: &str) -> NodeRef {
        Arc::new(EditorNode::root(id))
    }

    #[test]
    fn test_history_creation() {
        let history = History::new();
        assert_eq!(history.undo_levels(), 0);
        assert_eq!(history.redo_levels(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.max_levels(), 0);
    }

    #[test]
    fn test_step_back_and_forward() {
        let mut history = History::new();
        history.record(snapshot("a"));
        history.record(snapshot("b"));

        let restored = history.step_back(snapshot("c")).unwrap();
        assert_eq!(restored.id(), "b");
        assert_eq!(history.undo_levels(), 1);
        assert_eq!(history.redo_levels(), 1);

        let again = history.step_forward(restored).unwrap();
        assert_eq!(again.id(), "c");
        assert!(history.step_forward(again).is_none());
    }

    #[test]
    fn test_record_clears_future() {
        let mut history = History::new();
        history.record(snapshot("a"));
        history.step_back(snapshot("b"));
        assert!(history.can_redo());

        history.record(snapshot("a"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_max_levels_drops_oldest() {
        let mut history = History::with_max_levels(2);
        history.record(snapshot("a"));
        history.record(snapshot("b"));
        history.record(snapshot("c"));
        assert_eq!(history.undo_levels(), 2);

        assert_eq!(history.step_back(snapshot("d")).unwrap().id(), "c");
        assert_eq!(history.step_back(snapshot("c")).unwrap().id(), "b");
        assert!(history.step_back(snapshot("b")).is_none());
    }

    #[test]
    fn test_underflow_is_noop() {
        let state = EditorState::default();
        assert!(undo(&state).is_none());
        assert!(redo(&state).is_none());
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.record(snapshot("a"));
        history.step_back(snapshot("b"));
        history.record(snapshot("c"));
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
