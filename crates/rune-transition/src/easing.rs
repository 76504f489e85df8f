//! Easing functions for transition timing.
//!
//! This module implements the CSS timing functions used by
//! `transition-timing-function`:
//! - Linear
//! - Ease, EaseIn, EaseOut, EaseInOut (standard CSS curves)
//! - CubicBezier (custom bezier curves)
//! - Steps (stepped curves, jumping at the start and/or end of intervals)
//!
//! # Usage
//!
//! ```
//! use rune_transition::easing::{EasingFunction, StepPosition};
//!
//! let ease = EasingFunction::Ease;
//! let progress = ease.evaluate(0.5);
//!
//! let custom = EasingFunction::cubic_bezier(0.4, 0.0, 0.2, 1.0);
//! let stepped = EasingFunction::steps(4, StepPosition::JumpEnd);
//! assert_eq!(stepped.evaluate(0.3), 0.25);
//! # let _ = (progress, custom);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the jumps of a stepped curve happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepPosition {
    /// Jump at the start of each interval (CSS `jump-start` / `start`).
    #[serde(alias = "start")]
    JumpStart,
    /// Jump at the end of each interval (CSS `jump-end` / `end`).
    #[serde(alias = "end")]
    JumpEnd,
    /// Jump at both the start and the end (CSS `jump-both`).
    JumpBoth,
    /// No jump at either end (CSS `jump-none`).
    JumpNone,
}

impl Default for StepPosition {
    fn default() -> Self {
        Self::JumpEnd
    }
}

impl StepPosition {
    /// Parse a CSS step position keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "jump-start" | "start" => Some(Self::JumpStart),
            "jump-end" | "end" => Some(Self::JumpEnd),
            "jump-both" => Some(Self::JumpBoth),
            "jump-none" => Some(Self::JumpNone),
            _ => None,
        }
    }

    fn as_keyword(self) -> &'static str {
        match self {
            Self::JumpStart => "jump-start",
            Self::JumpEnd => "jump-end",
            Self::JumpBoth => "jump-both",
            Self::JumpNone => "jump-none",
        }
    }
}

/// Easing function for transition timing.
///
/// Maps a linear progress fraction (0.0 to 1.0) to an eased fraction. Bezier
/// curves with y control points outside [0, 1] overshoot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,

    /// CSS `ease` - Slow start, fast middle, slow end.
    /// Equivalent to `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    Ease,

    /// CSS `ease-in` - Slow start, accelerating.
    /// Equivalent to `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,

    /// CSS `ease-out` - Fast start, decelerating.
    /// Equivalent to `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,

    /// CSS `ease-in-out` - Slow start and end, fast middle.
    /// Equivalent to `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,

    /// Custom cubic bezier curve through (0,0), (x1,y1), (x2,y2), (1,1).
    /// x values must be in [0, 1], y values can be any float.
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },

    /// Stepped curve with `count` discrete intervals.
    Steps { count: u32, position: StepPosition },
}

impl Default for EasingFunction {
    fn default() -> Self {
        Self::Ease
    }
}

impl EasingFunction {
    /// Evaluate the easing function at the given progress.
    ///
    /// Input is clamped to [0, 1]; output may fall outside that range for
    /// overshooting bezier curves.
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(*x1, *y1, *x2, *y2, t),
            Self::Steps { count, position } => stepped(*count, *position, t),
        }
    }

    /// Create a custom cubic bezier easing function.
    ///
    /// # Panics
    /// Panics if x1 or x2 are outside [0, 1].
    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2),
            "Bezier x values must be in [0, 1]"
        );
        Self::CubicBezier { x1, y1, x2, y2 }
    }

    /// Create a stepped easing function.
    ///
    /// # Panics
    /// Panics if `steps` is 0, or below 2 with [`StepPosition::JumpNone`].
    pub fn steps(steps: u32, position: StepPosition) -> Self {
        assert!(steps >= 1, "Steps must be at least 1");
        assert!(
            position != StepPosition::JumpNone || steps >= 2,
            "jump-none requires at least 2 steps"
        );
        Self::Steps {
            count: steps,
            position,
        }
    }

    /// CSS `step-start`, i.e. `steps(1, jump-start)`.
    pub fn step_start() -> Self {
        Self::steps(1, StepPosition::JumpStart)
    }

    /// CSS `step-end`, i.e. `steps(1, jump-end)`.
    pub fn step_end() -> Self {
        Self::steps(1, StepPosition::JumpEnd)
    }
}

impl fmt::Display for EasingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Ease => f.write_str("ease"),
            Self::EaseIn => f.write_str("ease-in"),
            Self::EaseOut => f.write_str("ease-out"),
            Self::EaseInOut => f.write_str("ease-in-out"),
            Self::CubicBezier { x1, y1, x2, y2 } => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
            Self::Steps { count, position } => {
                write!(f, "steps({count}, {})", position.as_keyword())
            }
        }
    }
}

/// Evaluate a cubic bezier timing curve at input progress `progress`.
///
/// Finds the curve parameter whose x equals `progress`, then evaluates y
/// there.
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, progress: f64) -> f64 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    let t = solve_bezier_x(x1, x2, progress);
    bezier_y(y1, y2, t)
}

/// Solve x(t) = target_x for t.
///
/// Newton-Raphson converges in a few steps on well-behaved curves; flat
/// derivatives fall back to bisection, which always converges because x(t)
/// is monotonic for x control points in [0, 1].
fn solve_bezier_x(x1: f64, x2: f64, target_x: f64) -> f64 {
    const EPSILON: f64 = 1e-9;

    let mut t = target_x;
    for _ in 0..8 {
        let x = bezier_x(x1, x2, t) - target_x;
        if x.abs() < EPSILON {
            return t;
        }

        let dx = bezier_x_derivative(x1, x2, t);
        if dx.abs() < 1e-6 {
            break;
        }

        t = (t - x / dx).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    t = target_x;
    for _ in 0..64 {
        let x = bezier_x(x1, x2, t);
        if (x - target_x).abs() < EPSILON {
            break;
        }
        if x < target_x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) * 0.5;
    }
    t
}

/// x(t) = 3(1-t)²t·x1 + 3(1-t)t²·x2 + t³
#[inline]
fn bezier_x(x1: f64, x2: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;

    3.0 * mt2 * t * x1 + 3.0 * mt * t2 * x2 + t3
}

#[inline]
fn bezier_y(y1: f64, y2: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;

    3.0 * mt2 * t * y1 + 3.0 * mt * t2 * y2 + t3
}

/// dx/dt = 3(1-t)²·x1 + 6(1-t)t·(x2-x1) + 3t²·(1-x2)
#[inline]
fn bezier_x_derivative(x1: f64, x2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * x1 + 6.0 * mt * t * (x2 - x1) + 3.0 * t * t * (1.0 - x2)
}

/// CSS Easing Level 1 step algorithm, for input already clamped to [0, 1].
fn stepped(steps: u32, position: StepPosition, t: f64) -> f64 {
    let steps_f = f64::from(steps.max(1));

    let mut step = (t * steps_f).floor();
    if matches!(position, StepPosition::JumpStart | StepPosition::JumpBoth) {
        step += 1.0;
    }

    let jumps = match position {
        StepPosition::JumpStart | StepPosition::JumpEnd => steps_f,
        StepPosition::JumpBoth => steps_f + 1.0,
        StepPosition::JumpNone => (steps_f - 1.0).max(1.0),
    };

    step.clamp(0.0, jumps) / jumps
}
