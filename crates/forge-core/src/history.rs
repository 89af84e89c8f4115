//! Undo/redo history of whole-graph snapshots

use std::collections::VecDeque;

use crate::scene::SceneGraph;

/// Linear undo/redo history.
///
/// `past` holds states from before each committed command, most recent last.
/// `future` holds undone states, the next one to redo first.
#[derive(Debug, Clone, Default)]
pub struct History {
    past: Vec<SceneGraph>,
    future: VecDeque<SceneGraph>,
    limit: Option<usize>,
}

impl History {
    /// Create an unbounded history
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history keeping at most `limit` undo steps
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Record the state from before a command. Any redo states are discarded.
    pub fn record(&mut self, snapshot: SceneGraph) {
        self.past.push(snapshot);
        self.future.clear();
        if let Some(limit) = self.limit {
            let excess = self.past.len().saturating_sub(limit);
            if excess > 0 {
                self.past.drain(..excess);
                tracing::debug!("History limit {} reached, dropped {} states", limit, excess);
            }
        }
    }

    /// Step back: returns the previous state and remembers `current` for redo
    pub fn undo(&mut self, current: SceneGraph) -> Option<SceneGraph> {
        let previous = self.past.pop()?;
        self.future.push_front(current);
        Some(previous)
    }

    /// Step forward: returns the next state and remembers `current` for undo
    pub fn redo(&mut self, current: SceneGraph) -> Option<SceneGraph> {
        let next = self.future.pop_front()?;
        self.past.push(current);
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

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Forget every recorded state
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{PrimitiveKind, SceneNode};

    fn graph_with(count: usize) -> SceneGraph {
        let mut graph = SceneGraph::new();
        for i in 0..count {
            graph
                .add(SceneNode::primitive(PrimitiveKind::Box, format!("Box {}", i + 1)))
                .unwrap();
        }
        graph
    }

    #[test]
    fn test_undo_redo_walks_snapshots() {
        let mut history = History::new();
        let s0 = graph_with(0);
        let s1 = graph_with(1);
        let s2 = graph_with(2);

        history.record(s0.clone());
        history.record(s1.clone());
        let mut current = s2.clone();

        current = history.undo(current).unwrap();
        assert_eq!(current, s1);
        current = history.undo(current).unwrap();
        assert_eq!(current, s0);
        assert!(history.undo(current.clone()).is_none());

        current = history.redo(current).unwrap();
        assert_eq!(current, s1);
        current = history.redo(current).unwrap();
        assert_eq!(current, s2);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_record_clears_future() {
        let mut history = History::new();
        history.record(graph_with(0));
        let current = history.undo(graph_with(1)).unwrap();
        assert!(history.can_redo());

        history.record(current);
        assert!(!history.can_redo());
        assert_eq!(history.past_len(), 1);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::with_limit(Some(2));
        for i in 0..4 {
            history.record(graph_with(i));
        }
        assert_eq!(history.past_len(), 2);
        let restored = history.undo(graph_with(4)).unwrap();
        assert_eq!(restored.len(), 3);
    }
}
