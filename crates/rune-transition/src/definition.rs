//! Transition definitions: which property animates, for how long, after what
//! delay, along which curve.
//!
//! A definition list is produced fresh by every style pass; timers keep a
//! clone of the definition that created them.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use thiserror::Error;

use crate::easing::EasingFunction;
use crate::time::TimeSpan;

/// Lowercase-normalized property name. `all` matches every property.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PropertyName(String);

impl PropertyName {
    const ALL: &'static str = "all";

    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_ascii_lowercase())
    }

    /// The `all` wildcard.
    pub fn all() -> Self {
        Self(Self::ALL.to_string())
    }

    pub fn is_all(&self) -> bool {
        self.0 == Self::ALL
    }

    /// Whether a definition naming `self` applies to `property`.
    pub fn matches(&self, property: &PropertyName) -> bool {
        self.is_all() || self == property
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PropertyName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PropertyName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<PropertyName> for String {
    fn from(name: PropertyName) -> Self {
        name.0
    }
}

impl Borrow<str> for PropertyName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rejected definition parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionError {
    #[error("transition duration for `{property}` must not be negative (got {duration})")]
    NegativeDuration {
        property: PropertyName,
        duration: TimeSpan,
    },
}

/// One entry of a node's transition list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionDefinition {
    property: PropertyName,
    duration: TimeSpan,
    delay: TimeSpan,
    easing: EasingFunction,
}

impl TransitionDefinition {
    /// Create a definition with the given duration, no delay and the default
    /// easing.
    ///
    /// # Panics
    /// Panics if `duration` is negative.
    pub fn new(property: impl Into<PropertyName>, duration: TimeSpan) -> Self {
        match Self::try_new(property, duration) {
            Ok(definition) => definition,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_new(
        property: impl Into<PropertyName>,
        duration: TimeSpan,
    ) -> Result<Self, DefinitionError> {
        let property = property.into();
        if duration.is_negative() {
            return Err(DefinitionError::NegativeDuration { property, duration });
        }
        Ok(Self {
            property,
            duration,
            delay: TimeSpan::ZERO,
            easing: EasingFunction::default(),
        })
    }

    /// Set the delay. Negative delays start the transition part-way through.
    pub fn with_delay(mut self, delay: TimeSpan) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    pub fn property(&self) -> &PropertyName {
        &self.property
    }

    pub fn duration(&self) -> TimeSpan {
        self.duration
    }

    pub fn delay(&self) -> TimeSpan {
        self.delay
    }

    pub fn easing(&self) -> EasingFunction {
        self.easing
    }

    pub fn applies_to(&self, property: &PropertyName) -> bool {
        self.property.matches(property)
    }

    /// Whether this definition would create a timer.
    pub fn is_animated(&self) -> bool {
        self.duration.is_positive()
    }
}

impl fmt::Display for TransitionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.property, self.duration, self.easing, self.delay
        )
    }
}

static_assertions::assert_impl_all!(PropertyName: Send, Sync);
static_assertions::assert_impl_all!(TransitionDefinition: Send, Sync, Clone);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_name_normalized() {
        assert_eq!(PropertyName::new("  Opacity "), PropertyName::new("opacity"));
        assert!(PropertyName::new("ALL").is_all());
        assert_eq!(PropertyName::from("Background-Color").as_str(), "background-color");
    }

    #[test]
    fn test_wildcard_matches() {
        let opacity = PropertyName::new("opacity");
        assert!(PropertyName::all().matches(&opacity));
        assert!(opacity.matches(&PropertyName::new("OPACITY")));
        assert!(!opacity.matches(&PropertyName::new("width")));
    }

    #[test]
    fn test_builders() {
        let def = TransitionDefinition::new("Opacity", TimeSpan::from_millis(300))
            .with_delay(TimeSpan::from_millis(-50))
            .with_easing(EasingFunction::Linear);

        assert_eq!(def.property().as_str(), "opacity");
        assert_eq!(def.duration(), TimeSpan::from_millis(300));
        assert_eq!(def.delay(), TimeSpan::from_millis(-50));
        assert_eq!(def.easing(), EasingFunction::Linear);
        assert!(def.is_animated());
    }

    #[test]
    fn test_zero_duration_not_animated() {
        let def = TransitionDefinition::new("width", TimeSpan::ZERO);
        assert!(!def.is_animated());
        assert_eq!(def.easing(), EasingFunction::Ease);
    }

    #[test]
    fn test_try_new_rejects_negative_duration() {
        let err = TransitionDefinition::try_new("width", TimeSpan::from_millis(-1)).unwrap_err();
        assert!(matches!(err, DefinitionError::NegativeDuration { .. }));
        assert!(err.to_string().contains("`width`"));
    }

    #[test]
    #[should_panic(expected = "must not be negative")]
    fn test_new_panics_on_negative_duration() {
        TransitionDefinition::new("width", TimeSpan::from_millis(-1));
    }

    #[test]
    fn test_serialization() {
        let def = TransitionDefinition::new("opacity", TimeSpan::from_millis(250));
        let json = serde_json::to_string(&def).unwrap();
        assert!(json.contains("\"property\":\"opacity\""));
        assert!(json.contains("\"duration\":250000000"));

        let back: TransitionDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, def);
    }
}
