//! Time sources for the transition engine.
//!
//! The engine never reads wall-clock time directly; it asks a [`TimeSource`].
//! Pulses normally carry their own `now`, but timer creation and forced
//! cancellation need a reading at the instant they happen.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use crate::time::{TimeSpan, Timestamp};

/// Supplies monotonically non-decreasing readings of the animation time base.
pub trait TimeSource {
    fn now(&self) -> Timestamp;
}

/// A clock that only moves when told to.
///
/// Clones share the same reading, so a test can keep one handle while the
/// engine owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Timestamp>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock at a specific reading.
    pub fn starting_at(now: Timestamp) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }

    /// Move the clock forward and return the new reading.
    pub fn advance(&self, by: TimeSpan) -> Timestamp {
        let next = self.now.get() + by;
        self.now.set(next);
        next
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

/// Monotonic clock backed by [`Instant`], with its origin at construction.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SystemClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemClock")
            .field("elapsed", &self.origin.elapsed())
            .finish()
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        let nanos = i64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(i64::MAX);
        Timestamp::from_nanos(nanos)
    }
}
