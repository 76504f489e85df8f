//! Per-node bookkeeping of live transition timers.
//!
//! A node only has an entry while at least one of its properties is
//! transitioning; the entry disappears with its last timer.

use std::collections::{BTreeMap, HashMap};

use crate::definition::PropertyName;
use crate::timer::TransitionTimer;

/// Live timers for one node, keyed by property.
#[derive(Debug, Default)]
pub struct NodeTransitions {
    timers: BTreeMap<PropertyName, TransitionTimer>,
}

impl NodeTransitions {
    pub fn get(&self, property: &PropertyName) -> Option<&TransitionTimer> {
        self.timers.get(property)
    }

    pub fn contains(&self, property: &PropertyName) -> bool {
        self.timers.contains_key(property)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyName> {
        self.timers.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransitionTimer> {
        self.timers.values()
    }

    /// Consume the entry, yielding its timers in property order.
    pub fn into_timers(self) -> impl Iterator<Item = TransitionTimer> {
        self.timers.into_values()
    }
}

/// All live timers, keyed by node id.
#[derive(Debug, Default)]
pub struct TransitionRegistry {
    nodes: HashMap<String, NodeTransitions>,
}

impl TransitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, node_id: &str) -> Option<&NodeTransitions> {
        self.nodes.get(node_id)
    }

    pub fn get(&self, node_id: &str, property: &PropertyName) -> Option<&TransitionTimer> {
        self.nodes.get(node_id)?.get(property)
    }

    /// Register a freshly created timer.
    ///
    /// # Panics
    /// Panics if the (node, property) pair already has a timer, or if the
    /// timer is already terminal.
    pub fn insert(&mut self, timer: TransitionTimer) {
        assert!(
            !timer.is_terminal(),
            "terminal timer {:?} cannot be registered",
            timer.id()
        );

        let entry = self.nodes.entry(timer.node_id().to_string()).or_default();
        let property = timer.property().clone();
        assert!(
            !entry.contains(&property),
            "node `{}` already has a live transition for `{}`",
            timer.node_id(),
            property
        );
        entry.timers.insert(property, timer);
    }

    /// Remove one timer, dropping the node entry if it was the last.
    pub fn remove(&mut self, node_id: &str, property: &PropertyName) -> Option<TransitionTimer> {
        let entry = self.nodes.get_mut(node_id)?;
        let timer = entry.timers.remove(property);
        if entry.is_empty() {
            self.nodes.remove(node_id);
        }
        timer
    }

    /// Remove and return every timer for a node.
    pub fn take_node(&mut self, node_id: &str) -> Option<NodeTransitions> {
        self.nodes.remove(node_id)
    }

    /// Drop every timer that reached a terminal phase.
    pub fn remove_terminal(&mut self) -> usize {
        let mut removed = 0;
        self.nodes.retain(|_, entry| {
            let before = entry.timers.len();
            entry.timers.retain(|_, timer| !timer.is_terminal());
            removed += before - entry.timers.len();
            !entry.is_empty()
        });
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransitionTimer> {
        self.nodes.values().flat_map(|entry| entry.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TransitionTimer> {
        self.nodes.values_mut().flat_map(|entry| entry.timers.values_mut())
    }

    pub fn contains_node(&self, node_id: &str) -> bool {
        self.nodes.contains_key(node_id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of live timers.
    pub fn active_count(&self) -> usize {
        self.nodes.values().map(NodeTransitions::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::TransitionDefinition;
    use crate::events::EventQueue;
    use crate::time::{TimeSpan, Timestamp};
    use crate::value::StyleValue;

    fn timer(node: &str, property: &str) -> TransitionTimer {
        let mut timer = TransitionTimer::new(
            node,
            PropertyName::new(property),
            TransitionDefinition::new(property, TimeSpan::from_millis(100)),
            Timestamp::ORIGIN,
            StyleValue::number(0.0),
            StyleValue::number(1.0),
        );
        timer.begin(&mut EventQueue::new());
        timer
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut registry = TransitionRegistry::new();
        registry.insert(timer("a", "opacity"));
        registry.insert(timer("a", "width"));
        registry.insert(timer("b", "opacity"));

        assert_eq!(registry.active_count(), 3);
        assert_eq!(registry.node_count(), 2);
        assert!(registry.get("a", &PropertyName::new("width")).is_some());
        assert!(registry.get("b", &PropertyName::new("width")).is_none());

        let props: Vec<_> = registry.node("a").unwrap().properties().map(|p| p.as_str()).collect();
        assert_eq!(props, vec!["opacity", "width"]);
    }

    #[test]
    fn test_entry_absent_when_empty() {
        let mut registry = TransitionRegistry::new();
        registry.insert(timer("a", "opacity"));
        assert!(registry.contains_node("a"));

        assert!(registry.remove("a", &PropertyName::new("opacity")).is_some());
        assert!(!registry.contains_node("a"));
        assert!(registry.node("a").is_none());
        assert!(registry.is_empty());

        assert!(registry.remove("a", &PropertyName::new("opacity")).is_none());
    }

    #[test]
    fn test_remove_terminal() {
        let mut registry = TransitionRegistry::new();
        registry.insert(timer("a", "opacity"));
        registry.insert(timer("b", "opacity"));

        let mut events = EventQueue::new();
        for timer in registry.iter_mut().filter(|t| t.node_id() == "a") {
            timer.advance(Timestamp::ORIGIN + TimeSpan::from_millis(100), &mut events);
        }

        assert_eq!(registry.remove_terminal(), 1);
        assert!(!registry.contains_node("a"));
        assert!(registry.contains_node("b"));
    }

    #[test]
    fn test_take_node() {
        let mut registry = TransitionRegistry::new();
        registry.insert(timer("a", "opacity"));
        registry.insert(timer("a", "width"));

        let taken = registry.take_node("a").unwrap();
        assert_eq!(taken.len(), 2);
        assert!(registry.is_empty());
        assert!(registry.take_node("a").is_none());
    }

    #[test]
    #[should_panic(expected = "already has a live transition")]
    fn test_duplicate_insert_panics() {
        let mut registry = TransitionRegistry::new();
        registry.insert(timer("a", "opacity"));
        registry.insert(timer("a", "opacity"));
    }
}
