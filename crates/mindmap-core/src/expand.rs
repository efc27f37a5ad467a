//! Client-local expand/collapse state. Never persisted or shared.

use std::collections::HashMap;

use crate::model::NodeId;

/// Which nodes are shown expanded. Ids never set read as collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandState {
    entries: HashMap<NodeId, bool>,
}

impl ExpandState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given ids expanded.
    pub fn with_open<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeId>,
    {
        Self {
            entries: ids.into_iter().map(|id| (id.into(), true)).collect(),
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.entries.get(id).copied().unwrap_or(false)
    }

    /// Flip one id and return its new value.
    ///
    /// Ids that are not in any tree are accepted; they simply never match a
    /// rendered node.
    pub fn toggle(&mut self, id: &str) -> bool {
        let entry = self.entries.entry(NodeId::from(id)).or_insert(false);
        *entry = !*entry;
        *entry
    }

    pub fn set(&mut self, id: impl Into<NodeId>, expanded: bool) {
        self.entries.insert(id.into(), expanded);
    }

    /// Currently expanded ids, sorted.
    pub fn expanded_ids(&self) -> Vec<&NodeId> {
        let mut ids: Vec<&NodeId> = self
            .entries
            .iter()
            .filter_map(|(id, open)| open.then_some(id))
            .collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_ids_are_collapsed() {
        let state = ExpandState::new();
        assert!(!state.is_expanded("anything"));
    }

    #[test]
    fn toggling_twice_restores_the_original_value() {
        let mut state = ExpandState::with_open(["open"]);

        assert!(!state.toggle("open"));
        assert!(state.toggle("open"));
        assert!(state.is_expanded("open"));

        assert!(state.toggle("closed"));
        assert!(!state.toggle("closed"));
        assert!(!state.is_expanded("closed"));
    }

    #[test]
    fn set_and_list() {
        let mut state = ExpandState::with_open(["b", "a"]);
        state.set("c", true);
        state.set("a", false);
        let ids: Vec<&str> = state.expanded_ids().into_iter().map(NodeId::as_str).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }
}
