//! Runtime state of one property transition.
//!
//! A timer is created when a property's cascaded value changes and a
//! definition with a positive duration governs it. All reported elapsed
//! values derive from the schedule fixed at creation, never from the instant
//! a pulse happened to observe the change:
//!
//! ```text
//! active_elapsed(now) = max(0, (now - t0) - delay)
//! t_start             = t0 + max(0, delay)
//! t_end               = max(t0, t0 + delay + duration)
//! ```

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::definition::{PropertyName, TransitionDefinition};
use crate::events::{EventQueue, TransitionEvent, TransitionEventKind};
use crate::time::{TimeSpan, Timestamp};
use crate::value::{Interpolate, StyleValue};

/// Unique identifier for a transition timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

impl TimerId {
    /// Generate a new unique timer ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for TimerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle phase of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Constructed, `Run` not yet reported.
    Created,
    /// Waiting out a positive delay.
    PendingDelay,
    /// Interpolating.
    Active,
    /// Reached the end normally.
    Completed,
    /// Interrupted before the end.
    Cancelled,
}

impl TimerPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// A per-(node, property) transition in flight.
#[derive(Debug, Clone)]
pub struct TransitionTimer {
    id: TimerId,
    node_id: String,
    property: PropertyName,
    definition: TransitionDefinition,
    created_at: Timestamp,
    start_value: StyleValue,
    end_value: StyleValue,
    phase: TimerPhase,
}

impl TransitionTimer {
    pub fn new(
        node_id: impl Into<String>,
        property: PropertyName,
        definition: TransitionDefinition,
        created_at: Timestamp,
        start_value: StyleValue,
        end_value: StyleValue,
    ) -> Self {
        Self {
            id: TimerId::new(),
            node_id: node_id.into(),
            property,
            definition,
            created_at,
            start_value,
            end_value,
            phase: TimerPhase::Created,
        }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn property(&self) -> &PropertyName {
        &self.property
    }

    pub fn definition(&self) -> &TransitionDefinition {
        &self.definition
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn start_value(&self) -> &StyleValue {
        &self.start_value
    }

    pub fn end_value(&self) -> &StyleValue {
        &self.end_value
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Time spent in the active phase at `now`, counting a negative delay as
    /// a head start.
    pub fn active_elapsed(&self, now: Timestamp) -> TimeSpan {
        ((now - self.created_at) - self.definition.delay()).non_negative()
    }

    /// When the `Start` event is due.
    pub fn start_instant(&self) -> Timestamp {
        self.created_at + self.definition.delay().non_negative()
    }

    /// When the `End` event is due. Never earlier than creation.
    pub fn end_instant(&self) -> Timestamp {
        let end = self.created_at + self.definition.delay() + self.definition.duration();
        end.max(self.created_at)
    }

    /// Report `Run`, and `Start` as well when there is no positive delay.
    ///
    /// # Panics
    /// Panics if the timer has already begun.
    pub fn begin(&mut self, events: &mut EventQueue) {
        assert_eq!(
            self.phase,
            TimerPhase::Created,
            "transition timer {:?} began twice",
            self.id
        );

        self.phase = TimerPhase::PendingDelay;
        self.emit(events, TransitionEventKind::Run, self.active_elapsed(self.created_at));

        if !self.definition.delay().is_positive() {
            self.enter_active(events);
        }
    }

    /// Fire whichever scheduled events are due at `now`.
    ///
    /// Several may fire in one call when the pulse came late. Returns the
    /// phase afterwards. Terminal timers are left untouched.
    pub fn advance(&mut self, now: Timestamp, events: &mut EventQueue) -> TimerPhase {
        if self.phase == TimerPhase::PendingDelay && now >= self.start_instant() {
            self.enter_active(events);
        }

        if self.phase == TimerPhase::Active && now >= self.end_instant() {
            self.phase = TimerPhase::Completed;
            self.emit(events, TransitionEventKind::End, self.definition.duration());
        }

        self.phase
    }

    /// Interrupt the timer at `now`.
    ///
    /// # Panics
    /// Panics if the timer already completed or was cancelled.
    pub fn cancel(&mut self, now: Timestamp, events: &mut EventQueue) {
        assert!(
            !self.phase.is_terminal(),
            "cannot cancel transition timer {:?} in phase {:?}",
            self.id,
            self.phase
        );

        self.phase = TimerPhase::Cancelled;
        self.emit(events, TransitionEventKind::Cancel, self.active_elapsed(now));
    }

    /// Linear progress through the active phase, in [0, 1].
    pub fn progress(&self, now: Timestamp) -> f64 {
        let duration = self.definition.duration();
        if !duration.is_positive() {
            return 1.0;
        }
        let elapsed = self.active_elapsed(now);
        (elapsed.as_nanos() as f64 / duration.as_nanos() as f64).min(1.0)
    }

    /// The value the property should display at `now`. Does not change the
    /// phase.
    pub fn value_at(&self, now: Timestamp) -> StyleValue {
        if self.phase.is_terminal() || now >= self.end_instant() {
            return self.end_value.clone();
        }
        if now < self.start_instant() {
            return self.start_value.clone();
        }

        let eased = self.definition.easing().evaluate(self.progress(now));
        self.start_value.interpolate(&self.end_value, eased)
    }

    fn enter_active(&mut self, events: &mut EventQueue) {
        self.phase = TimerPhase::Active;
        self.emit(events, TransitionEventKind::Start, self.active_elapsed(self.start_instant()));
    }

    fn emit(&self, events: &mut EventQueue, kind: TransitionEventKind, elapsed: TimeSpan) {
        events.push(TransitionEvent {
            kind,
            timer_id: self.id,
            node_id: self.node_id.clone(),
            property: self.property.clone(),
            elapsed,
        });
    }
}

static_assertions::assert_impl_all!(TransitionTimer: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::EasingFunction;

    fn ms(millis: i64) -> TimeSpan {
        TimeSpan::from_millis(millis)
    }

    fn at(millis: i64) -> Timestamp {
        Timestamp::ORIGIN + ms(millis)
    }

    fn timer(duration: i64, delay: i64) -> TransitionTimer {
        let definition = TransitionDefinition::new("opacity", ms(duration))
            .with_delay(ms(delay))
            .with_easing(EasingFunction::Linear);
        TransitionTimer::new(
            "box",
            PropertyName::new("opacity"),
            definition,
            Timestamp::ORIGIN,
            StyleValue::number(0.0),
            StyleValue::number(1.0),
        )
    }

    fn kinds(events: &mut EventQueue) -> Vec<(TransitionEventKind, TimeSpan)> {
        events.drain().map(|e| (e.kind, e.elapsed)).collect()
    }

    #[test]
    fn test_positive_delay_schedule() {
        let mut t = timer(750, 250);
        let mut events = EventQueue::new();

        t.begin(&mut events);
        assert_eq!(t.phase(), TimerPhase::PendingDelay);
        assert_eq!(kinds(&mut events), vec![(TransitionEventKind::Run, TimeSpan::ZERO)]);

        assert_eq!(t.advance(at(200), &mut events), TimerPhase::PendingDelay);
        assert!(events.is_empty());

        // polled late: still reports the scheduled elapsed
        assert_eq!(t.advance(at(500), &mut events), TimerPhase::Active);
        assert_eq!(kinds(&mut events), vec![(TransitionEventKind::Start, TimeSpan::ZERO)]);

        assert_eq!(t.advance(at(1000), &mut events), TimerPhase::Completed);
        assert_eq!(kinds(&mut events), vec![(TransitionEventKind::End, ms(750))]);
    }

    #[test]
    fn test_negative_delay_head_start() {
        let mut t = timer(1000, -250);
        let mut events = EventQueue::new();

        t.begin(&mut events);
        assert_eq!(t.phase(), TimerPhase::Active);
        assert_eq!(
            kinds(&mut events),
            vec![(TransitionEventKind::Run, ms(250)), (TransitionEventKind::Start, ms(250))]
        );

        t.cancel(at(500), &mut events);
        assert_eq!(t.phase(), TimerPhase::Cancelled);
        assert_eq!(kinds(&mut events), vec![(TransitionEventKind::Cancel, ms(750))]);
    }

    #[test]
    fn test_cancel_during_delay() {
        let mut t = timer(1000, 500);
        let mut events = EventQueue::new();

        t.begin(&mut events);
        t.advance(at(250), &mut events);
        t.cancel(at(250), &mut events);
        assert_eq!(
            kinds(&mut events),
            vec![(TransitionEventKind::Run, TimeSpan::ZERO), (TransitionEventKind::Cancel, TimeSpan::ZERO)]
        );
    }

    #[test]
    fn test_late_pulse_fires_start_and_end_together() {
        let mut t = timer(100, 100);
        let mut events = EventQueue::new();
        t.begin(&mut events);
        events.drain().for_each(drop);

        assert_eq!(t.advance(at(5000), &mut events), TimerPhase::Completed);
        assert_eq!(
            kinds(&mut events),
            vec![(TransitionEventKind::Start, TimeSpan::ZERO), (TransitionEventKind::End, ms(100))]
        );

        // nothing after a terminal event
        assert_eq!(t.advance(at(6000), &mut events), TimerPhase::Completed);
        assert!(events.is_empty());
    }

    #[test]
    fn test_end_clamped_to_creation() {
        let t = timer(100, -500);
        assert_eq!(t.start_instant(), Timestamp::ORIGIN);
        assert_eq!(t.end_instant(), Timestamp::ORIGIN);

        let mut t = t;
        let mut events = EventQueue::new();
        t.begin(&mut events);
        assert_eq!(t.advance(Timestamp::ORIGIN, &mut events), TimerPhase::Completed);
        assert_eq!(
            kinds(&mut events),
            vec![
                (TransitionEventKind::Run, ms(500)),
                (TransitionEventKind::Start, ms(500)),
                (TransitionEventKind::End, ms(100)),
            ]
        );
    }

    #[test]
    fn test_value_at() {
        let mut t = timer(1000, 200);
        let mut events = EventQueue::new();
        t.begin(&mut events);

        assert_eq!(t.value_at(at(100)), StyleValue::number(0.0));
        let mid = t.value_at(at(700)).as_number().unwrap();
        assert!((mid - 0.5).abs() < 1e-9);
        assert_eq!(t.value_at(at(1200)), StyleValue::number(1.0));

        // read-side only
        assert_eq!(t.phase(), TimerPhase::PendingDelay);
        assert!((t.progress(at(450)) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_cancelled_value_is_end() {
        let mut t = timer(1000, 0);
        let mut events = EventQueue::new();
        t.begin(&mut events);
        t.cancel(at(100), &mut events);
        assert_eq!(t.value_at(at(100)), StyleValue::number(1.0));
    }

    #[test]
    #[should_panic(expected = "began twice")]
    fn test_begin_twice_panics() {
        let mut t = timer(100, 0);
        let mut events = EventQueue::new();
        t.begin(&mut events);
        t.begin(&mut events);
    }

    #[test]
    #[should_panic(expected = "cannot cancel")]
    fn test_cancel_after_end_panics() {
        let mut t = timer(100, 0);
        let mut events = EventQueue::new();
        t.begin(&mut events);
        t.advance(at(100), &mut events);
        t.cancel(at(150), &mut events);
    }

    #[test]
    fn test_ids_unique() {
        assert_ne!(timer(1, 0).id(), timer(1, 0).id());
    }
}
