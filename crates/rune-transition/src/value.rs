//! Styleable property values and interpolation between them.
//!
//! Numeric values (numbers, colors, edge insets) blend linearly and
//! extrapolate when an overshooting easing curve pushes the fraction past
//! [0, 1]. Discrete values (keywords, flags) cannot blend: they hold the
//! start value until the eased fraction reaches 1.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trait for types that can be interpolated between two values.
pub trait Interpolate: Sized {
    /// Interpolate between self and another value.
    ///
    /// When t = 0.0, returns self.
    /// When t = 1.0, returns to.
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

#[inline]
fn lerp_f64(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

#[inline]
fn lerp_f32(from: f32, to: f32, t: f64) -> f32 {
    (from as f64 + (to as f64 - from as f64) * t) as f32
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        lerp_f64(*self, *to, t)
    }
}

impl Interpolate for f32 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        lerp_f32(*self, *to, t)
    }
}

impl Interpolate for [f32; 4] {
    /// Per-component RGBA blend.
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        [
            lerp_f32(self[0], to[0], t),
            lerp_f32(self[1], to[1], t),
            lerp_f32(self[2], to[2], t),
            lerp_f32(self[3], to[3], t),
        ]
    }
}

/// Box edge offsets (padding, margin, border widths).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl EdgeInsets {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }
}

impl Interpolate for EdgeInsets {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Self {
            top: lerp_f64(self.top, to.top, t),
            right: lerp_f64(self.right, to.right, t),
            bottom: lerp_f64(self.bottom, to.bottom, t),
            left: lerp_f64(self.left, to.left, t),
        }
    }
}

/// A computed value of a styleable property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StyleValue {
    /// Scalar value (opacity, width, font size, ...).
    Number { value: f64 },
    /// RGBA color, components in [0, 1].
    Color { rgba: [f32; 4] },
    /// Four-sided box value.
    Insets { insets: EdgeInsets },
    /// Enumerated value such as `visible` or `bold`.
    Keyword { value: String },
    /// Boolean value.
    Flag { value: bool },
}

impl StyleValue {
    pub fn number(value: f64) -> Self {
        Self::Number { value }
    }

    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::Color { rgba: [r, g, b, a] }
    }

    pub fn insets(insets: EdgeInsets) -> Self {
        Self::Insets { insets }
    }

    pub fn keyword(value: impl Into<String>) -> Self {
        Self::Keyword {
            value: value.into(),
        }
    }

    pub fn flag(value: bool) -> Self {
        Self::Flag { value }
    }

    /// The scalar value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number { value } => Some(*value),
            _ => None,
        }
    }

    /// Whether values of this kind blend continuously.
    pub fn is_continuous(&self) -> bool {
        matches!(
            self,
            Self::Number { .. } | Self::Color { .. } | Self::Insets { .. }
        )
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Number { value }
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        Self::Flag { value }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number { value } => write!(f, "{value:.3}"),
            Self::Color { rgba: [r, g, b, a] } => {
                write!(f, "rgba({r:.3}, {g:.3}, {b:.3}, {a:.3})")
            }
            Self::Insets { insets } => write!(
                f,
                "{:.3} {:.3} {:.3} {:.3}",
                insets.top, insets.right, insets.bottom, insets.left
            ),
            Self::Keyword { value } => f.write_str(value),
            Self::Flag { value } => write!(f, "{value}"),
        }
    }
}

impl Interpolate for StyleValue {
    /// Mismatched kinds and discrete kinds switch to `to` once `t >= 1`.
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        match (self, to) {
            (Self::Number { value: from }, Self::Number { value: to_val }) => Self::Number {
                value: from.interpolate(to_val, t),
            },
            (Self::Color { rgba: from }, Self::Color { rgba: to_val }) => Self::Color {
                rgba: from.interpolate(to_val, t),
            },
            (Self::Insets { insets: from }, Self::Insets { insets: to_val }) => Self::Insets {
                insets: from.interpolate(to_val, t),
            },
            _ if t >= 1.0 => to.clone(),
            _ => self.clone(),
        }
    }
}
