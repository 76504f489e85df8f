//! Exact time arithmetic for transition scheduling.
//!
//! All spans and clock readings are integer nanoseconds so that scheduled
//! instants (`t0 + delay + duration`) and the elapsed values reported in
//! lifecycle events are reproducible regardless of how often the clock is
//! polled.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};

const NANOS_PER_MILLI: i64 = 1_000_000;
const NANOS_PER_SEC: f64 = 1_000_000_000.0;
// 2^63, the first float past the i64 range.
const NANOS_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// A signed span of time.
///
/// Durations are never negative once they reach the engine; delays may be.
/// Arithmetic saturates at the ends of the `i64` nanosecond range.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TimeSpan(i64);

impl TimeSpan {
    /// The empty span.
    pub const ZERO: Self = Self(0);

    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub const fn from_millis(millis: i64) -> Self {
        Self(millis * NANOS_PER_MILLI)
    }

    /// Create a span from fractional milliseconds, rounded to the nearest
    /// nanosecond. Out-of-range values saturate.
    pub fn from_millis_f64(millis: f64) -> Self {
        Self((millis * NANOS_PER_MILLI as f64).round() as i64)
    }

    /// Like [`TimeSpan::from_millis_f64`], but `None` when the value is not
    /// finite or does not fit in the nanosecond range.
    pub fn try_from_millis_f64(millis: f64) -> Option<Self> {
        let nanos = (millis * NANOS_PER_MILLI as f64).round();
        (nanos.is_finite() && (-NANOS_LIMIT..NANOS_LIMIT).contains(&nanos))
            .then(|| Self(nanos as i64))
    }

    /// Create a span from fractional seconds, rounded to the nearest nanosecond.
    pub fn from_secs_f64(secs: f64) -> Self {
        Self((secs * NANOS_PER_SEC).round() as i64)
    }

    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    pub fn as_millis_f64(self) -> f64 {
        self.0 as f64 / NANOS_PER_MILLI as f64
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Clamp negative spans to zero.
    pub fn non_negative(self) -> Self {
        self.max(Self::ZERO)
    }
}

impl Add for TimeSpan {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for TimeSpan {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for TimeSpan {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for TimeSpan {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.as_millis_f64())
    }
}

/// An absolute reading of the animation time base.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The time base origin.
    pub const ORIGIN: Self = Self(0);

    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    /// Span elapsed since the time base origin.
    pub const fn since_origin(self) -> TimeSpan {
        TimeSpan(self.0)
    }
}

impl Add<TimeSpan> for Timestamp {
    type Output = Self;

    fn add(self, rhs: TimeSpan) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Timestamp {
    type Output = TimeSpan;

    fn sub(self, rhs: Self) -> TimeSpan {
        TimeSpan(self.0.saturating_sub(rhs.0))
    }
}

impl Sub<TimeSpan> for Timestamp {
    type Output = Self;

    fn sub(self, rhs: TimeSpan) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.since_origin())
    }
}
