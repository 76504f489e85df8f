//! Where displayed property values live.
//!
//! The engine writes every interpolated sample and every final snap through
//! [`PropertyStore`]; hosts can plug in their own scene storage.

use std::collections::HashMap;

use crate::definition::PropertyName;
use crate::value::StyleValue;

/// Storage for the displayed value of each (node, property).
pub trait PropertyStore {
    fn get(&self, node_id: &str, property: &PropertyName) -> Option<&StyleValue>;

    fn set(&mut self, node_id: &str, property: &PropertyName, value: StyleValue);

    /// Forget every value stored for a node.
    fn remove_node(&mut self, node_id: &str);
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct StyleStore {
    nodes: HashMap<String, HashMap<PropertyName, StyleValue>>,
}

impl StyleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored values for a node.
    pub fn node(&self, node_id: &str) -> Option<&HashMap<PropertyName, StyleValue>> {
        self.nodes.get(node_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl PropertyStore for StyleStore {
    fn get(&self, node_id: &str, property: &PropertyName) -> Option<&StyleValue> {
        self.nodes.get(node_id)?.get(property)
    }

    fn set(&mut self, node_id: &str, property: &PropertyName, value: StyleValue) {
        match self.nodes.get_mut(node_id) {
            Some(values) => {
                values.insert(property.clone(), value);
            }
            None => {
                let mut values = HashMap::new();
                values.insert(property.clone(), value);
                self.nodes.insert(node_id.to_string(), values);
            }
        }
    }

    fn remove_node(&mut self, node_id: &str) {
        self.nodes.remove(node_id);
    }
}
