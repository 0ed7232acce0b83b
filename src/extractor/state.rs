//! Extraction state tracking.
//!
//! `ExtractionState` tracks which nodes are already represented by an item
//! and hands out vertical positions for items whose node has no geometry.

use std::collections::HashSet;

use dom_query::NodeId;

/// Gap between synthetic positions.
pub const SYNTHETIC_STEP: f64 = 0.01;

/// Per-container walk state.
///
/// # Purpose
///
/// - **Consumed nodes**: nodes inside an already-classified subtree (cells
///   of an extracted table, the inner `.katex` of a display wrapper) are
///   never classified again.
/// - **Positions**: the last known `y`, so nodes without geometry land right
///   after their predecessor in traversal order.
#[derive(Debug, Default)]
pub struct ExtractionState {
    consumed: HashSet<NodeId>,
    last_y: f64,
}

impl ExtractionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a node as represented by an item.
    pub fn consume(&mut self, node_id: NodeId) {
        self.consumed.insert(node_id);
    }

    /// Mark several nodes at once.
    pub fn consume_all(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.consumed.extend(ids);
    }

    #[must_use]
    pub fn is_consumed(&self, node_id: NodeId) -> bool {
        self.consumed.contains(&node_id)
    }

    /// Number of nodes consumed so far.
    #[must_use]
    pub fn consumed_count(&self) -> usize {
        self.consumed.len()
    }

    /// Position for the next item: the measured top when there is one,
    /// otherwise a step past the previous item.
    pub fn position(&mut self, measured: Option<f64>) -> f64 {
        self.last_y = match measured {
            Some(top) => top,
            None => self.last_y + SYNTHETIC_STEP,
        };
        self.last_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    #[test]
    fn test_consumed_tracking() {
        let doc = dom::parse("<p id='a'>1</p><p id='b'>2</p>");
        let a = dom::node_id(&doc.select("#a")).unwrap();
        let b = dom::node_id(&doc.select("#b")).unwrap();
        let mut state = ExtractionState::new();

        state.consume(a);
        assert!(state.is_consumed(a));
        assert!(!state.is_consumed(b));

        state.consume_all([a, b]);
        assert_eq!(state.consumed_count(), 2);
    }

    #[test]
    fn test_synthetic_positions_increase() {
        let mut state = ExtractionState::new();
        let first = state.position(None);
        let second = state.position(None);
        assert!(second > first);
    }

    #[test]
    fn test_measured_position_resets_the_base() {
        let mut state = ExtractionState::new();
        assert_eq!(state.position(Some(100.0)), 100.0);
        let next = state.position(None);
        assert!(next > 100.0 && next < 100.1);
        assert_eq!(state.position(Some(40.0)), 40.0);
    }
}
