//! The transition driver.
//!
//! [`TransitionEngine`] owns the registry of live timers and coordinates:
//! - style re-resolution ([`TransitionEngine::apply_style`])
//! - clock pulses ([`TransitionEngine::pulse`], [`TransitionEngine::pulse_at`])
//! - forced completion when a node stops being live
//! - dispatch of lifecycle events to listeners
//!
//! Registry state is final before any listener runs, so a listener that
//! re-enters the engine (detaching its own node, restyling) sees a
//! consistent view. Events raised from inside a listener are queued and
//! delivered by the outermost dispatch loop.
//!
//! # Usage
//!
//! ```
//! use rune_transition::{StyleValue, TimeSpan, Timestamp, TransitionDefinition, TransitionEngine};
//! use rune_transition::clock::ManualClock;
//!
//! let clock = ManualClock::new();
//! let mut engine = TransitionEngine::new().with_clock(clock.clone());
//! let defs = [TransitionDefinition::new("opacity", TimeSpan::from_millis(200))];
//!
//! engine.apply_style("card", &defs, [("opacity", StyleValue::number(0.0))]);
//! assert_eq!(engine.apply_style("card", &defs, [("opacity", StyleValue::number(1.0))]), 1);
//!
//! engine.pulse_at(Timestamp::ORIGIN + TimeSpan::from_millis(200));
//! assert_eq!(engine.value("card", "opacity"), Some(&StyleValue::number(1.0)));
//! assert!(engine.transitions("card").is_none());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use rune_config::TransitionSettings;

use crate::clock::{SystemClock, TimeSource};
use crate::definition::{PropertyName, TransitionDefinition};
use crate::events::{EventQueue, ListenerId, TransitionEvent, TransitionListener};
use crate::registry::{NodeTransitions, TransitionRegistry};
use crate::selector::select_definition;
use crate::store::{PropertyStore, StyleStore};
use crate::time::Timestamp;
use crate::timer::TransitionTimer;
use crate::value::StyleValue;

struct ListenerEntry {
    id: ListenerId,
    /// `None` listens to every node.
    node_id: Option<String>,
    listener: Rc<dyn TransitionListener>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeLiveness {
    attached: bool,
    visible: bool,
}

impl NodeLiveness {
    fn is_live(self) -> bool {
        self.attached && self.visible
    }
}

impl Default for NodeLiveness {
    fn default() -> Self {
        Self {
            attached: true,
            visible: true,
        }
    }
}

/// Drives property transitions for a scene.
pub struct TransitionEngine {
    clock: Box<dyn TimeSource>,
    store: Box<dyn PropertyStore>,
    registry: TransitionRegistry,
    listeners: Vec<ListenerEntry>,
    /// Events whose state changes are final, awaiting dispatch.
    pending: EventQueue,
    dispatching: bool,
    /// Nodes without an entry are attached and visible.
    liveness: HashMap<String, NodeLiveness>,
    settings: TransitionSettings,
    last_pulse: Option<Timestamp>,
}

impl Default for TransitionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TransitionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionEngine")
            .field("registry", &self.registry)
            .field("listeners", &self.listeners.len())
            .field("pending", &self.pending.len())
            .field("settings", &self.settings)
            .field("last_pulse", &self.last_pulse)
            .finish_non_exhaustive()
    }
}

impl TransitionEngine {
    /// Create an engine on the system clock with an in-memory store.
    pub fn new() -> Self {
        Self {
            clock: Box::new(SystemClock::new()),
            store: Box::new(StyleStore::new()),
            registry: TransitionRegistry::new(),
            listeners: Vec::new(),
            pending: EventQueue::new(),
            dispatching: false,
            liveness: HashMap::new(),
            settings: TransitionSettings::default(),
            last_pulse: None,
        }
    }

    pub fn with_clock(mut self, clock: impl TimeSource + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_store(mut self, store: impl PropertyStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    pub fn with_settings(mut self, settings: &TransitionSettings) -> Self {
        self.settings = settings.clone();
        self
    }

    pub fn settings(&self) -> &TransitionSettings {
        &self.settings
    }

    pub fn store(&self) -> &dyn PropertyStore {
        self.store.as_ref()
    }

    /// Current time: the clock reading, never earlier than the last pulse.
    pub fn now(&self) -> Timestamp {
        let now = self.clock.now();
        match self.last_pulse {
            Some(last) if last > now => last,
            _ => now,
        }
    }

    /// Apply a style pass's newly cascaded values for a node.
    ///
    /// `definitions` is the node's current transition list. For each value
    /// that differs from the property's previous target, a running timer is
    /// cancelled and, if a definition with a positive duration governs the
    /// property, a new timer starts from the value displayed right now. A
    /// property seen for the first time is set without a transition.
    ///
    /// Returns the number of timers created.
    pub fn apply_style<I, P>(
        &mut self,
        node_id: &str,
        definitions: &[TransitionDefinition],
        values: I,
    ) -> usize
    where
        I: IntoIterator<Item = (P, StyleValue)>,
        P: Into<PropertyName>,
    {
        let now = self.now();
        let animate = self.settings.enabled && self.is_node_live(node_id);
        let mut created = 0;

        for (property, value) in values {
            let property = property.into();
            if self.restyle_property(node_id, &property, value, definitions, animate, now) {
                created += 1;
            }
        }

        self.flush_events();
        created
    }

    fn restyle_property(
        &mut self,
        node_id: &str,
        property: &PropertyName,
        value: StyleValue,
        definitions: &[TransitionDefinition],
        animate: bool,
        now: Timestamp,
    ) -> bool {
        let previous = match self.registry.get(node_id, property) {
            Some(timer) => Some(timer.end_value().clone()),
            None => self.store.get(node_id, property).cloned(),
        };
        let Some(previous) = previous else {
            tracing::trace!(node = %node_id, property = %property, "initial value");
            self.store.set(node_id, property, value);
            return false;
        };
        if previous == value {
            return false;
        }

        let mut start_value = previous;
        if let Some(mut timer) = self.registry.remove(node_id, property) {
            timer.advance(now, &mut self.pending);
            start_value = timer.value_at(now);
            if !timer.is_terminal() {
                tracing::debug!(
                    node = %node_id,
                    property = %property,
                    "superseding running transition"
                );
                timer.cancel(now, &mut self.pending);
            }
        } else if let Some(displayed) = self.store.get(node_id, property) {
            start_value = displayed.clone();
        }

        let definition = if animate {
            select_definition(definitions, property).filter(|d| d.is_animated())
        } else {
            None
        };
        let Some(definition) = definition else {
            self.store.set(node_id, property, value);
            return false;
        };

        let mut timer = TransitionTimer::new(
            node_id,
            property.clone(),
            definition.clone(),
            now,
            start_value,
            value,
        );
        tracing::debug!(
            node = %node_id,
            property = %property,
            duration = %definition.duration(),
            delay = %definition.delay(),
            "starting transition"
        );
        timer.begin(&mut self.pending);
        timer.advance(now, &mut self.pending);
        self.store.set(node_id, property, timer.value_at(now));
        if !timer.is_terminal() {
            self.registry.insert(timer);
        }
        true
    }

    /// Pulse at the clock's current reading.
    pub fn pulse(&mut self) {
        let now = self.clock.now();
        self.pulse_at(now);
    }

    /// Advance every live timer to `now`, firing due events and writing the
    /// displayed values.
    pub fn pulse_at(&mut self, now: Timestamp) {
        let now = match self.last_pulse {
            Some(last) if now < last => {
                tracing::warn!(now = %now, last = %last, "pulse went backwards, clamping");
                last
            }
            _ => now,
        };
        self.last_pulse = Some(now);

        for timer in self.registry.iter_mut() {
            timer.advance(now, &mut self.pending);
            self.store
                .set(timer.node_id(), timer.property(), timer.value_at(now));
        }

        let finished = self.registry.remove_terminal();
        if finished > 0 {
            tracing::trace!(finished, "transitions completed");
        }
        self.flush_events();
    }

    /// The node became part of the scene.
    pub fn node_attached(&mut self, node_id: &str) {
        self.liveness.entry(node_id.to_string()).or_default().attached = true;
    }

    /// The node left the scene. Its transitions complete immediately.
    pub fn node_detached(&mut self, node_id: &str) {
        self.liveness.entry(node_id.to_string()).or_default().attached = false;
        self.complete_node(node_id);
    }

    pub fn node_shown(&mut self, node_id: &str) {
        self.liveness.entry(node_id.to_string()).or_default().visible = true;
    }

    /// The node stopped being visible. Its transitions complete immediately.
    pub fn node_hidden(&mut self, node_id: &str) {
        self.liveness.entry(node_id.to_string()).or_default().visible = false;
        self.complete_node(node_id);
    }

    /// Whether the node is attached and visible.
    pub fn is_node_live(&self, node_id: &str) -> bool {
        self.liveness
            .get(node_id)
            .is_none_or(|liveness| liveness.is_live())
    }

    /// Force every transition on the node to finish now.
    ///
    /// Timers already past their end report `End`; the rest report `Cancel`
    /// with the real elapsed time. Properties snap to their targets. Returns
    /// the number of timers finished.
    pub fn complete_node(&mut self, node_id: &str) -> usize {
        let Some(entry) = self.registry.take_node(node_id) else {
            return 0;
        };

        let now = self.now();
        let mut finished = 0;
        for mut timer in entry.into_timers() {
            timer.advance(now, &mut self.pending);
            if !timer.is_terminal() {
                timer.cancel(now, &mut self.pending);
            }
            self.store
                .set(node_id, timer.property(), timer.end_value().clone());
            finished += 1;
        }

        tracing::debug!(node = %node_id, finished, "forced transition completion");
        self.flush_events();
        finished
    }

    /// Complete the node's transitions and forget everything about it.
    pub fn remove_node(&mut self, node_id: &str) {
        self.complete_node(node_id);
        self.liveness.remove(node_id);
        self.store.remove_node(node_id);
    }

    /// Live transitions for a node; `None` when it has none.
    pub fn transitions(&self, node_id: &str) -> Option<&NodeTransitions> {
        self.registry.node(node_id)
    }

    pub fn timer(
        &self,
        node_id: &str,
        property: impl Into<PropertyName>,
    ) -> Option<&TransitionTimer> {
        self.registry.get(node_id, &property.into())
    }

    /// Total number of live transitions.
    pub fn active_count(&self) -> usize {
        self.registry.active_count()
    }

    pub fn has_active_transitions(&self, node_id: &str) -> bool {
        self.registry.contains_node(node_id)
    }

    /// The displayed value of a property.
    pub fn value(&self, node_id: &str, property: impl Into<PropertyName>) -> Option<&StyleValue> {
        self.store.get(node_id, &property.into())
    }

    /// Listen to events for every node.
    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&mut TransitionEngine, &TransitionEvent) -> anyhow::Result<()> + 'static,
    {
        self.register_listener(None, Rc::new(listener))
    }

    /// Listen to events for one node.
    pub fn add_node_listener<F>(&mut self, node_id: &str, listener: F) -> ListenerId
    where
        F: Fn(&mut TransitionEngine, &TransitionEvent) -> anyhow::Result<()> + 'static,
    {
        self.register_listener(Some(node_id), Rc::new(listener))
    }

    /// Register a listener object, optionally scoped to one node.
    pub fn register_listener(
        &mut self,
        node_id: Option<&str>,
        listener: Rc<dyn TransitionListener>,
    ) -> ListenerId {
        let id = ListenerId::new();
        self.listeners.push(ListenerEntry {
            id,
            node_id: node_id.map(str::to_string),
            listener,
        });
        id
    }

    /// Returns false if no listener had this id.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|entry| entry.id != id);
        self.listeners.len() != before
    }

    fn flush_events(&mut self) {
        if self.dispatching {
            return;
        }
        self.dispatching = true;

        while let Some(event) = self.pending.pop() {
            if self.settings.log_events {
                tracing::info!(
                    kind = %event.kind,
                    node = %event.node_id,
                    property = %event.property,
                    elapsed = %event.elapsed,
                    "transition event"
                );
            } else {
                tracing::debug!(
                    kind = %event.kind,
                    node = %event.node_id,
                    property = %event.property,
                    elapsed = %event.elapsed,
                    "transition event"
                );
            }

            let listeners: Vec<Rc<dyn TransitionListener>> = self
                .listeners
                .iter()
                .filter(|entry| entry.node_id.as_deref().is_none_or(|id| id == event.node_id))
                .map(|entry| Rc::clone(&entry.listener))
                .collect();

            for listener in listeners {
                let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    listener.on_transition_event(self, &event)
                }));
                // a panicking listener must not leave dispatch wedged for
                // hosts that catch the unwind
                let result = match result {
                    Ok(result) => result,
                    Err(payload) => {
                        self.dispatching = false;
                        std::panic::resume_unwind(payload);
                    }
                };
                if let Err(err) = result {
                    tracing::warn!(
                        kind = %event.kind,
                        node = %event.node_id,
                        property = %event.property,
                        error = %format!("{err:#}"),
                        "transition listener failed"
                    );
                }
            }
        }

        self.dispatching = false;
    }
}
