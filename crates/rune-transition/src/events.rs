//! Transition lifecycle events and listener plumbing.
//!
//! Every timer reports `Run`, optionally `Start`, then exactly one of `End`
//! or `Cancel`. Events are queued only after the registry reflects the state
//! change they describe, then handed to listeners by the engine.
//!
//! # Usage
//!
//! ```
//! use rune_transition::{StyleValue, TimeSpan, TransitionDefinition, TransitionEngine};
//! use rune_transition::clock::ManualClock;
//! use rune_transition::events::TransitionEvent;
//!
//! let mut engine = TransitionEngine::new().with_clock(ManualClock::new());
//! engine.add_listener(|_: &mut TransitionEngine, event: &TransitionEvent| {
//!     println!("{event}");
//!     Ok(())
//! });
//!
//! let defs = [TransitionDefinition::new("opacity", TimeSpan::from_millis(300))];
//! engine.apply_style("card", &defs, [("opacity", StyleValue::number(0.0))]);
//! engine.apply_style("card", &defs, [("opacity", StyleValue::number(1.0))]);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::definition::PropertyName;
use crate::engine::TransitionEngine;
use crate::time::TimeSpan;
use crate::timer::TimerId;

/// Lifecycle event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionEventKind {
    /// Timer created. Always first, always exactly once.
    Run,
    /// Delay elapsed; interpolation begins.
    Start,
    /// Reached the end of its duration.
    End,
    /// Interrupted before reaching the end.
    Cancel,
}

impl TransitionEventKind {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::End | Self::Cancel)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Run => "transitionrun",
            Self::Start => "transitionstart",
            Self::End => "transitionend",
            Self::Cancel => "transitioncancel",
        }
    }
}

impl fmt::Display for TransitionEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub kind: TransitionEventKind,
    /// The timer that produced this event.
    pub timer_id: TimerId,
    pub node_id: String,
    pub property: PropertyName,
    /// Active elapsed time at the moment the event is scheduled for.
    pub elapsed: TimeSpan,
}

impl fmt::Display for TransitionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}.{} elapsed={}",
            self.kind, self.node_id, self.property, self.elapsed
        )
    }
}

/// FIFO queue of events awaiting dispatch.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<TransitionEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TransitionEvent) {
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<TransitionEvent> {
        self.events.pop_front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = TransitionEvent> + '_ {
        self.events.drain(..)
    }

    pub fn peek(&self) -> Option<&TransitionEvent> {
        self.events.front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Queued events for a specific node, oldest first.
    pub fn events_for_node<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a TransitionEvent> + 'a {
        self.events.iter().filter(move |e| e.node_id == node_id)
    }
}

/// Handle returned when registering a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u64);

impl ListenerId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Receives lifecycle events.
///
/// Listeners get the engine back and may mutate it (change styles, detach
/// nodes, remove listeners). Events raised while a listener runs are
/// delivered after the current event has reached every listener.
pub trait TransitionListener {
    fn on_transition_event(
        &self,
        engine: &mut TransitionEngine,
        event: &TransitionEvent,
    ) -> anyhow::Result<()>;
}

impl<F> TransitionListener for F
where
    F: Fn(&mut TransitionEngine, &TransitionEvent) -> anyhow::Result<()>,
{
    fn on_transition_event(
        &self,
        engine: &mut TransitionEngine,
        event: &TransitionEvent,
    ) -> anyhow::Result<()> {
        self(engine, event)
    }
}

static_assertions::assert_impl_all!(TransitionEvent: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: TransitionEventKind, node: &str) -> TransitionEvent {
        TransitionEvent {
            kind,
            timer_id: TimerId(7),
            node_id: node.to_string(),
            property: PropertyName::new("opacity"),
            elapsed: TimeSpan::from_millis(250),
        }
    }

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = EventQueue::new();
        queue.push(event(TransitionEventKind::Run, "a"));
        queue.push(event(TransitionEventKind::Start, "a"));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek().unwrap().kind, TransitionEventKind::Run);
        assert_eq!(queue.pop().unwrap().kind, TransitionEventKind::Run);
        assert_eq!(queue.pop().unwrap().kind, TransitionEventKind::Start);
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_events_for_node() {
        let mut queue = EventQueue::new();
        queue.push(event(TransitionEventKind::Run, "a"));
        queue.push(event(TransitionEventKind::Run, "b"));
        queue.push(event(TransitionEventKind::End, "a"));

        assert_eq!(queue.events_for_node("a").count(), 2);
        assert_eq!(queue.events_for_node("c").count(), 0);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained.len(), 3);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_terminal_kinds() {
        assert!(TransitionEventKind::End.is_terminal());
        assert!(TransitionEventKind::Cancel.is_terminal());
        assert!(!TransitionEventKind::Run.is_terminal());
        assert!(!TransitionEventKind::Start.is_terminal());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&event(TransitionEventKind::Cancel, "box")).unwrap();
        assert!(json.contains("\"kind\":\"cancel\""));
        assert!(json.contains("\"property\":\"opacity\""));
        assert!(json.contains("\"elapsed\":250000000"));
    }

    #[test]
    fn test_display() {
        let text = event(TransitionEventKind::End, "box").to_string();
        assert_eq!(text, "transitionend box.opacity elapsed=250ms");
    }

    #[test]
    fn test_listener_ids_unique() {
        assert_ne!(ListenerId::new(), ListenerId::new());
    }
}
